use super::views::{PageError, render};
use crate::Registrar;
use crate::model::{NewCourse, NewStudent};
use axum::extract::{Path, State};
use axum::response::{Html, Redirect};
use campus_kernel::server::FormFields;
use minijinja::context;

type PageResult<T> = Result<T, PageError>;

fn selected_courses(form: &FormFields) -> PageResult<Vec<i64>> {
    form.all("courses")
        .map(|raw| {
            raw.trim()
                .parse::<i64>()
                .map_err(|_| PageError::bad_request(format!("Invalid course selection: {raw}")))
        })
        .collect()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

pub(super) async fn index(State(registrar): State<Registrar>) -> PageResult<Html<String>> {
    let students = registrar.manager.list_students().await?;
    render("index.html", context! { students })
}

pub(super) async fn create_student_form(
    State(registrar): State<Registrar>,
) -> PageResult<Html<String>> {
    let courses = registrar.manager.list_courses().await?;
    render("add_student.html", context! { courses })
}

pub(super) async fn create_student(
    State(registrar): State<Registrar>,
    form: FormFields,
) -> PageResult<Redirect> {
    let input = NewStudent {
        roll_number: form.text("roll").to_owned(),
        first_name: form.text("f_name").to_owned(),
        last_name: non_blank(form.first("l_name")).map(str::to_owned),
        course_ids: selected_courses(&form)?,
    };
    registrar.manager.create_student(input).await?;
    Ok(Redirect::to("/"))
}

pub(super) async fn update_student_form(
    State(registrar): State<Registrar>,
    Path(student_id): Path<i64>,
) -> PageResult<Html<String>> {
    let student = registrar.manager.student(student_id).await?;
    let courses = registrar.manager.list_courses().await?;
    let enrolled: Vec<i64> =
        registrar.manager.enrollments(student_id).await?.iter().map(|e| e.course_id).collect();
    render("update_student.html", context! { student, courses, enrolled })
}

pub(super) async fn update_student(
    State(registrar): State<Registrar>,
    Path(student_id): Path<i64>,
    form: FormFields,
) -> PageResult<Redirect> {
    let course_ids = selected_courses(&form)?;
    registrar
        .manager
        .update_student(student_id, form.text("f_name"), form.first("l_name"), &course_ids)
        .await?;
    Ok(Redirect::to("/"))
}

pub(super) async fn delete_student(
    State(registrar): State<Registrar>,
    Path(student_id): Path<i64>,
) -> PageResult<Redirect> {
    registrar.manager.delete_student(student_id).await?;
    Ok(Redirect::to("/"))
}

pub(super) async fn student_details(
    State(registrar): State<Registrar>,
    Path(student_id): Path<i64>,
) -> PageResult<Html<String>> {
    let student = registrar.manager.student(student_id).await?;
    let courses = registrar.manager.student_courses(student_id).await?;
    render("student_details.html", context! { student, courses })
}

pub(super) async fn withdraw(
    State(registrar): State<Registrar>,
    Path((student_id, course_id)): Path<(i64, i64)>,
) -> PageResult<Redirect> {
    registrar.manager.withdraw(student_id, course_id).await?;
    Ok(Redirect::to(&format!("/student/{student_id}")))
}

pub(super) async fn courses(State(registrar): State<Registrar>) -> PageResult<Html<String>> {
    let courses = registrar.manager.list_courses().await?;
    render("courses.html", context! { courses })
}

pub(super) async fn create_course_form() -> PageResult<Html<String>> {
    render("add_course.html", context! {})
}

pub(super) async fn create_course(
    State(registrar): State<Registrar>,
    form: FormFields,
) -> PageResult<Redirect> {
    let input = NewCourse {
        course_code: form.text("code").to_owned(),
        course_name: form.text("c_name").to_owned(),
        course_description: non_blank(form.first("desc")).map(str::to_owned),
    };
    registrar.manager.create_course(input).await?;
    Ok(Redirect::to("/courses"))
}

pub(super) async fn course_details(
    State(registrar): State<Registrar>,
    Path(course_id): Path<i64>,
) -> PageResult<Html<String>> {
    let course = registrar.manager.course(course_id).await?;
    let students = registrar.manager.course_students(course_id).await?;
    render("course_details.html", context! { course, students })
}

pub(super) async fn update_course_form(
    State(registrar): State<Registrar>,
    Path(course_id): Path<i64>,
) -> PageResult<Html<String>> {
    let course = registrar.manager.course(course_id).await?;
    render("update_course.html", context! { course })
}

pub(super) async fn update_course(
    State(registrar): State<Registrar>,
    Path(course_id): Path<i64>,
    form: FormFields,
) -> PageResult<Redirect> {
    registrar.manager.update_course(course_id, form.text("c_name"), form.first("desc")).await?;
    Ok(Redirect::to("/courses"))
}

pub(super) async fn delete_course(
    State(registrar): State<Registrar>,
    Path(course_id): Path<i64>,
) -> PageResult<Redirect> {
    registrar.manager.delete_course(course_id).await?;
    Ok(Redirect::to("/courses"))
}
