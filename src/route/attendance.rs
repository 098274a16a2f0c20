use rocket::serde::json::Json;
use rocket::State;

use crate::data::attendance::db::{problem, AttendanceCreateData, AttendanceUpdateData};
use crate::data::attendance::Attendance;
use crate::data::user::db::problem as user_problem;
use crate::data::Store;
use crate::resp::jwt::{auth_problem, SessionToken};
use crate::resp::problem::Problem;
use crate::role::Role;
use crate::util;

#[derive(Debug, Clone, FromForm)]
pub struct AttendanceQuery {
    #[field(name = "classId")]
    pub class_id: Option<i64>,
    /// RFC 3339 timestamp or bare `YYYY-MM-DD`.
    pub date: Option<String>,
}

#[get("/attendance?<query..>")]
#[tracing::instrument(skip(store))]
pub fn attendance_query(
    query: AttendanceQuery,
    store: &State<Store>,
) -> Result<Json<Vec<Attendance>>, Problem> {
    let class_id = query.class_id.ok_or_else(problem::missing_query)?;
    let raw_date = query.date.ok_or_else(problem::missing_query)?;
    let date = util::parse_date_param(&raw_date).ok_or_else(|| problem::bad_date(&raw_date))?;

    Ok(Json(store.attendance_for_class(class_id, date)))
}

/// The calling student's own records, newest first.
#[get("/attendance/my")]
#[tracing::instrument(skip(store))]
pub fn attendance_my(
    auth: SessionToken,
    store: &State<Store>,
) -> Result<Json<Vec<Attendance>>, Problem> {
    let user = store
        .user(auth.user)
        .ok_or_else(|| user_problem::not_found(auth.user))?;
    if user.class_id.is_none() {
        return Err(user_problem::no_class_assigned());
    }

    Ok(Json(store.attendance_for_student(user.id)))
}

#[post("/attendance", format = "application/json", data = "<record>")]
#[tracing::instrument(skip(store))]
pub fn attendance_create(
    record: Json<AttendanceCreateData>,
    auth: SessionToken,
    store: &State<Store>,
) -> Result<Json<Attendance>, Problem> {
    if auth.role < Role::Teacher {
        return Err(auth_problem("Only teachers can mark attendance."));
    }

    Ok(Json(store.create_attendance(record.into_inner())))
}

#[patch("/attendance/<id>", format = "application/json", data = "<record>")]
#[tracing::instrument(skip(store))]
pub fn attendance_update(
    id: i64,
    record: Json<AttendanceUpdateData>,
    auth: SessionToken,
    store: &State<Store>,
) -> Result<Json<Attendance>, Problem> {
    if auth.role < Role::Teacher {
        return Err(auth_problem("Only teachers can update attendance."));
    }

    store
        .update_attendance(id, record.into_inner())
        .map(Json)
        .ok_or_else(|| problem::not_found(id))
}

#[cfg(test)]
mod attendance_endpoints {
    use rocket::http::Status;
    use serde_json::json;

    use crate::data::attendance::db::AttendanceCreateData;
    use crate::data::attendance::{Attendance, AttendanceStatus};
    use crate::route::testing;
    use chrono::Utc;

    #[rocket::async_test]
    async fn query_without_params_is_a_bad_request() {
        let client = testing::client().await;

        let response = client.get("/api/attendance").dispatch().await;
        assert_eq!(response.status(), Status::BadRequest);

        let response = client.get("/api/attendance?classId=1").dispatch().await;
        assert_eq!(response.status(), Status::BadRequest);

        let response = client
            .get("/api/attendance?classId=1&date=yesterday")
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);
    }

    #[rocket::async_test]
    async fn mark_then_query_by_bare_date() {
        let client = testing::client().await;
        let teacher = testing::seed_teacher(&client, "dana");
        let cookie = testing::session_cookie(&client, &teacher);

        let response = client
            .post("/api/attendance")
            .cookie(cookie)
            .json(&json!({
                "studentId": 1,
                "classId": 1,
                "date": "2024-01-10T14:30:00Z",
                "status": "present",
                "location": {"lat": 46.4917, "lng": -84.3205}
            }))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        let created: Attendance = response.into_json().await.expect("valid attendance json");
        assert_eq!(created.status, AttendanceStatus::Present);
        assert!(created.location.is_some());

        // A bare date parameter is resolved against the same local day
        // as the stored timestamp.
        let day = crate::util::local_day(created.date);
        let found: Vec<Attendance> = client
            .get(format!("/api/attendance?classId=1&date={}", day))
            .dispatch()
            .await
            .into_json()
            .await
            .expect("valid attendance json");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, created.id);
    }

    #[rocket::async_test]
    async fn marking_requires_a_teacher_session() {
        let client = testing::client().await;
        let student = testing::seed_student(&client, "ben", Some(1));
        let cookie = testing::session_cookie(&client, &student);

        let body = json!({
            "studentId": student.id,
            "classId": 1,
            "date": "2024-01-10T09:00:00Z",
            "status": "present"
        });

        let response = client.post("/api/attendance").json(&body).dispatch().await;
        assert_eq!(response.status(), Status::Unauthorized);

        let response = client
            .post("/api/attendance")
            .cookie(cookie)
            .json(&body)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Unauthorized);
    }

    #[rocket::async_test]
    async fn patch_of_missing_record_is_not_found() {
        let client = testing::client().await;
        let teacher = testing::seed_teacher(&client, "dana");
        let cookie = testing::session_cookie(&client, &teacher);

        let response = client
            .patch("/api/attendance/42")
            .cookie(cookie)
            .json(&json!({"status": "late"}))
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::NotFound);
    }

    #[rocket::async_test]
    async fn patch_updates_status_and_keeps_note() {
        let client = testing::client().await;
        let teacher = testing::seed_teacher(&client, "dana");
        let cookie = testing::session_cookie(&client, &teacher);

        let created = testing::store(&client).create_attendance(AttendanceCreateData {
            student_id: 1,
            class_id: 1,
            date: Utc::now(),
            status: AttendanceStatus::Present,
            note: Some("seat 4".to_string()),
            location: None,
        });

        let response = client
            .patch(format!("/api/attendance/{}", created.id))
            .cookie(cookie)
            .json(&json!({"status": "left_early"}))
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::Ok);
        let updated: Attendance = response.into_json().await.expect("valid attendance json");
        assert_eq!(updated.status, AttendanceStatus::LeftEarly);
        assert_eq!(updated.note.as_deref(), Some("seat 4"));
    }

    #[rocket::async_test]
    async fn my_records_require_a_session_and_a_class() {
        let client = testing::client().await;

        let response = client.get("/api/attendance/my").dispatch().await;
        assert_eq!(response.status(), Status::Unauthorized);

        let unassigned = testing::seed_student(&client, "ben", None);
        let response = client
            .get("/api/attendance/my")
            .cookie(testing::session_cookie(&client, &unassigned))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);
    }

    #[rocket::async_test]
    async fn my_records_come_back_newest_first() {
        let client = testing::client().await;
        let student = testing::seed_student(&client, "ben", Some(1));
        let cookie = testing::session_cookie(&client, &student);

        let store = testing::store(&client);
        for (day, status) in [
            (8, AttendanceStatus::Present),
            (10, AttendanceStatus::Late),
            (9, AttendanceStatus::Absent),
        ] {
            store.create_attendance(AttendanceCreateData {
                student_id: student.id,
                class_id: 1,
                date: format!("2024-01-{:02}T09:00:00Z", day).parse().unwrap(),
                status,
                note: None,
                location: None,
            });
        }

        let response = client.get("/api/attendance/my").cookie(cookie).dispatch().await;
        assert_eq!(response.status(), Status::Ok);

        let records: Vec<Attendance> = response.into_json().await.expect("valid attendance json");
        let statuses: Vec<AttendanceStatus> = records.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![
                AttendanceStatus::Late,
                AttendanceStatus::Absent,
                AttendanceStatus::Present
            ]
        );
    }
}
