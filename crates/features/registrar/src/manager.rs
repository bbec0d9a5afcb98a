use crate::error::{ErrorCode, RegistrarError};
use crate::model::{
    Course, CoursePatch, Enrollment, NewCourse, NewStudent, Student, StudentPatch, distinct,
    optional, required,
};
use campus_database::Database;
use campus_domain::constants::{COUNTER, COURSE, ENROLLMENT, STUDENT};
use tracing::{debug, info, instrument, warn};

type Result<T> = std::result::Result<T, RegistrarError>;

const STUDENT_FIELDS: &str = "student_id, roll_number, first_name, last_name";
const COURSE_FIELDS: &str = "course_id, course_code, course_name, course_description";
const ENROLLMENT_FIELDS: &str = "enrollment_id, student_id, course_id";

/// Enrollment id expression evaluated once per created row.
const NEXT_ENROLLMENT_ID: &str = "(UPSERT ONLY counter:enrollment SET seq += 1 RETURN VALUE seq)";

/// Aborts the surrounding transaction when one of `$courses` does not exist.
///
/// The courses are rewritten in place, so a concurrent `delete_course` on any
/// of them conflicts with this transaction at commit instead of interleaving.
fn courses_guard() -> String {
    format!(
        "IF array::len((UPDATE {COURSE} SET course_id = course_id
            WHERE course_id IN $courses RETURN VALUE course_id))
            != array::len($courses) {{ THROW 'ENROLLMENT001'; }};"
    )
}

/// Unwraps a query response, surfacing the first failed statement.
macro_rules! checked {
    ($query:expr) => {
        $query
            .await
            .map_err(RegistrarError::from_store)?
            .check()
            .map_err(|e| RegistrarError::from_store(surrealdb::Error::from(e)))?
    };
}

/// Owns the consistency rules for students, courses and enrollments.
///
/// Every multi-row mutation is a single `BEGIN … COMMIT` script, so it
/// either lands completely or not at all. Uniqueness is checked up front for
/// a precise error and enforced again by the unique indexes at commit; a
/// write rejected there is explained by re-reading the rows it collided with.
#[derive(Debug, Clone)]
pub struct EnrollmentManager {
    db: Database,
}

impl EnrollmentManager {
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    // --- Reads ---

    /// # Errors
    /// Store failures only.
    pub async fn list_students(&self) -> Result<Vec<Student>> {
        let mut response = checked!(
            self.db.query(format!("SELECT {STUDENT_FIELDS} FROM {STUDENT} ORDER BY student_id"))
        );
        response.take::<Vec<Student>>(0).map_err(RegistrarError::from_store)
    }

    /// # Errors
    /// Store failures only.
    pub async fn list_courses(&self) -> Result<Vec<Course>> {
        let mut response = checked!(
            self.db.query(format!("SELECT {COURSE_FIELDS} FROM {COURSE} ORDER BY course_id"))
        );
        response.take::<Vec<Course>>(0).map_err(RegistrarError::from_store)
    }

    /// # Errors
    /// [`RegistrarError::NotFound`] if no student has this id.
    pub async fn student(&self, student_id: i64) -> Result<Student> {
        self.find_student(student_id).await?.ok_or(RegistrarError::not_found("Student not found"))
    }

    /// # Errors
    /// [`RegistrarError::NotFound`] if no course has this id.
    pub async fn course(&self, course_id: i64) -> Result<Course> {
        self.find_course(course_id).await?.ok_or(RegistrarError::not_found("Course not found"))
    }

    /// Enrollment rows of a student, oldest first. Unknown students have none.
    ///
    /// # Errors
    /// Store failures only.
    pub async fn enrollments(&self, student_id: i64) -> Result<Vec<Enrollment>> {
        self.enrollments_where("student_id", student_id).await
    }

    /// One course per enrollment of the student, in enrollment order.
    ///
    /// # Errors
    /// [`RegistrarError::NotFound`] if the student does not exist.
    pub async fn student_courses(&self, student_id: i64) -> Result<Vec<Course>> {
        self.student(student_id).await?;
        let enrollments = self.enrollments_where("student_id", student_id).await?;
        let ids: Vec<i64> = enrollments.iter().map(|e| e.course_id).collect();
        let courses = self.courses_by_id(&ids).await?;

        Ok(enrollments
            .iter()
            .filter_map(|e| courses.iter().find(|c| c.course_id == e.course_id).cloned())
            .collect())
    }

    /// One student per enrollment in the course, in enrollment order.
    ///
    /// # Errors
    /// [`RegistrarError::NotFound`] if the course does not exist.
    pub async fn course_students(&self, course_id: i64) -> Result<Vec<Student>> {
        self.course(course_id).await?;
        let enrollments = self.enrollments_where("course_id", course_id).await?;
        let ids: Vec<i64> = enrollments.iter().map(|e| e.student_id).collect();
        let students = self.students_by_id(&ids).await?;

        Ok(enrollments
            .iter()
            .filter_map(|e| students.iter().find(|s| s.student_id == e.student_id).cloned())
            .collect())
    }

    // --- Students ---

    /// Inserts a student and one enrollment per distinct course id, atomically.
    ///
    /// # Errors
    /// * [`RegistrarError::Validation`] for a blank roll number or first name.
    /// * [`RegistrarError::DuplicateKey`] if the roll number is taken.
    /// * [`RegistrarError::NotFound`] (`ENROLLMENT001`) if a course id does not exist.
    #[instrument(skip(self, input), fields(roll_number = %input.roll_number))]
    pub async fn create_student(&self, input: NewStudent) -> Result<Student> {
        let roll_number = required(&input.roll_number);
        let first_name = required(&input.first_name);
        if roll_number.is_empty() {
            return Err(RegistrarError::invalid(ErrorCode::RollNumberRequired));
        }
        if first_name.is_empty() {
            return Err(RegistrarError::invalid(ErrorCode::FirstNameRequired));
        }
        if self.roll_owner(&roll_number).await?.is_some() {
            return Err(RegistrarError::duplicate("Roll number already exists."));
        }

        let course_ids = distinct(&input.course_ids);
        self.ensure_courses_exist(&course_ids).await?;

        let student = Student {
            student_id: self.next_id(STUDENT).await?,
            roll_number,
            first_name,
            last_name: optional(input.last_name.as_deref()),
        };

        let guard = courses_guard();
        let written: Result<()> = async {
            checked!(
                self.db
                    .query(format!(
                        "BEGIN TRANSACTION;
                    {guard}
                    CREATE {STUDENT} CONTENT {{
                        student_id: $student_id,
                        roll_number: $roll_number,
                        first_name: $first_name,
                        last_name: $last_name
                    }};
                    FOR $course IN $courses {{
                        CREATE {ENROLLMENT} CONTENT {{
                            enrollment_id: {NEXT_ENROLLMENT_ID},
                            student_id: $student_id,
                            course_id: $course
                        }};
                    }};
                    COMMIT TRANSACTION;"
                    ))
                    .bind(("student_id", student.student_id))
                    .bind(("roll_number", student.roll_number.clone()))
                    .bind(("first_name", student.first_name.clone()))
                    .bind(("last_name", student.last_name.clone()))
                    .bind(("courses", course_ids.clone()))
            );
            Ok(())
        }
        .await;
        if let Err(err) = written {
            return Err(self.student_rejection(err, &student, &course_ids).await);
        }

        info!(student_id = student.student_id, "Student created");
        Ok(student)
    }

    /// Sets names and replaces the whole enrollment set (delete-all, then insert).
    ///
    /// # Errors
    /// * [`RegistrarError::NotFound`] if the student, or one of the courses, does not exist.
    /// * [`RegistrarError::Validation`] for a blank first name.
    #[instrument(skip(self, first_name, last_name))]
    pub async fn update_student(
        &self,
        student_id: i64,
        first_name: &str,
        last_name: Option<&str>,
        course_ids: &[i64],
    ) -> Result<Student> {
        let mut student = self.student(student_id).await?;
        let first_name = required(first_name);
        if first_name.is_empty() {
            return Err(RegistrarError::invalid(ErrorCode::FirstNameRequired));
        }

        let course_ids = distinct(course_ids);
        self.ensure_courses_exist(&course_ids).await?;

        student.first_name = first_name;
        student.last_name = optional(last_name);

        let guard = courses_guard();
        let written: Result<()> = async {
            checked!(
                self.db
                    .query(format!(
                        "BEGIN TRANSACTION;
                    {guard}
                    UPDATE {STUDENT} SET first_name = $first_name, last_name = $last_name
                        WHERE student_id = $student_id;
                    DELETE {ENROLLMENT} WHERE student_id = $student_id;
                    FOR $course IN $courses {{
                        CREATE {ENROLLMENT} CONTENT {{
                            enrollment_id: {NEXT_ENROLLMENT_ID},
                            student_id: $student_id,
                            course_id: $course
                        }};
                    }};
                    COMMIT TRANSACTION;"
                    ))
                    .bind(("student_id", student_id))
                    .bind(("first_name", student.first_name.clone()))
                    .bind(("last_name", student.last_name.clone()))
                    .bind(("courses", course_ids.clone()))
            );
            Ok(())
        }
        .await;
        if let Err(err) = written {
            return Err(self.student_rejection(err, &student, &course_ids).await);
        }

        info!(student_id, "Student updated");
        Ok(student)
    }

    /// Partial update of the student fields; enrollments are untouched.
    ///
    /// # Errors
    /// * [`RegistrarError::NotFound`] if the student does not exist.
    /// * [`RegistrarError::Validation`] if a supplied required field is blank.
    /// * [`RegistrarError::DuplicateKey`] if the new roll number belongs to another student.
    #[instrument(skip(self, patch))]
    pub async fn amend_student(&self, student_id: i64, patch: StudentPatch) -> Result<Student> {
        let mut student = self.student(student_id).await?;

        if let Some(roll_number) = patch.roll_number.as_deref().map(required) {
            if roll_number.is_empty() {
                return Err(RegistrarError::invalid(ErrorCode::RollNumberRequired));
            }
            if self.roll_owner(&roll_number).await?.is_some_and(|owner| owner != student_id) {
                return Err(RegistrarError::duplicate("Roll number already exists."));
            }
            student.roll_number = roll_number;
        }
        if let Some(first_name) = patch.first_name.as_deref().map(required) {
            if first_name.is_empty() {
                return Err(RegistrarError::invalid(ErrorCode::FirstNameRequired));
            }
            student.first_name = first_name;
        }
        if patch.last_name.is_some() {
            student.last_name = optional(patch.last_name.as_deref());
        }

        let written: Result<()> = async {
            checked!(
                self.db
                    .query(format!(
                        "UPDATE {STUDENT} SET
                        roll_number = $roll_number,
                        first_name = $first_name,
                        last_name = $last_name
                    WHERE student_id = $student_id"
                    ))
                    .bind(("student_id", student_id))
                    .bind(("roll_number", student.roll_number.clone()))
                    .bind(("first_name", student.first_name.clone()))
                    .bind(("last_name", student.last_name.clone()))
            );
            Ok(())
        }
        .await;
        if let Err(err) = written {
            return Err(self.student_rejection(err, &student, &[]).await);
        }

        Ok(student)
    }

    /// Deletes the student's enrollments, then the student, in one transaction.
    ///
    /// # Errors
    /// [`RegistrarError::NotFound`] if the student does not exist.
    #[instrument(skip(self))]
    pub async fn delete_student(&self, student_id: i64) -> Result<()> {
        self.student(student_id).await?;
        checked!(
            self.db
                .query(format!(
                    "BEGIN TRANSACTION;
                    DELETE {ENROLLMENT} WHERE student_id = $student_id;
                    DELETE {STUDENT} WHERE student_id = $student_id;
                    COMMIT TRANSACTION;"
                ))
                .bind(("student_id", student_id))
        );
        info!(student_id, "Student deleted");
        Ok(())
    }

    // --- Courses ---

    /// # Errors
    /// * [`RegistrarError::Validation`] for a blank name (`COURSE001`) or code (`COURSE002`).
    /// * [`RegistrarError::DuplicateKey`] if the code is taken.
    #[instrument(skip(self, input), fields(course_code = %input.course_code))]
    pub async fn create_course(&self, input: NewCourse) -> Result<Course> {
        let course_name = required(&input.course_name);
        let course_code = required(&input.course_code);
        if course_name.is_empty() {
            return Err(RegistrarError::invalid(ErrorCode::CourseNameRequired));
        }
        if course_code.is_empty() {
            return Err(RegistrarError::invalid(ErrorCode::CourseCodeRequired));
        }
        if self.code_owner(&course_code).await?.is_some() {
            return Err(RegistrarError::duplicate("Course code already exists."));
        }

        let course = Course {
            course_id: self.next_id(COURSE).await?,
            course_code,
            course_name,
            course_description: optional(input.course_description.as_deref()),
        };

        let written: Result<()> = async {
            checked!(
                self.db
                    .query(format!(
                        "CREATE {COURSE} CONTENT {{
                        course_id: $course_id,
                        course_code: $course_code,
                        course_name: $course_name,
                        course_description: $course_description
                    }}"
                    ))
                    .bind(("course_id", course.course_id))
                    .bind(("course_code", course.course_code.clone()))
                    .bind(("course_name", course.course_name.clone()))
                    .bind(("course_description", course.course_description.clone()))
            );
            Ok(())
        }
        .await;
        if let Err(err) = written {
            return Err(self.course_rejection(err, &course).await);
        }

        info!(course_id = course.course_id, "Course created");
        Ok(course)
    }

    /// Edits name and description; the code stays as created.
    ///
    /// # Errors
    /// * [`RegistrarError::NotFound`] if the course does not exist.
    /// * [`RegistrarError::Validation`] for a blank name.
    #[instrument(skip(self, course_name, course_description))]
    pub async fn update_course(
        &self,
        course_id: i64,
        course_name: &str,
        course_description: Option<&str>,
    ) -> Result<Course> {
        self.amend_course(
            course_id,
            CoursePatch {
                course_code: None,
                course_name: Some(course_name.to_owned()),
                course_description: Some(course_description.unwrap_or_default().to_owned()),
            },
        )
        .await
    }

    /// Partial update of the course fields.
    ///
    /// # Errors
    /// * [`RegistrarError::NotFound`] if the course does not exist.
    /// * [`RegistrarError::Validation`] if a supplied required field is blank.
    /// * [`RegistrarError::DuplicateKey`] if the new code belongs to another course.
    #[instrument(skip(self, patch))]
    pub async fn amend_course(&self, course_id: i64, patch: CoursePatch) -> Result<Course> {
        let mut course = self.course(course_id).await?;

        if let Some(course_name) = patch.course_name.as_deref().map(required) {
            if course_name.is_empty() {
                return Err(RegistrarError::invalid(ErrorCode::CourseNameRequired));
            }
            course.course_name = course_name;
        }
        if let Some(course_code) = patch.course_code.as_deref().map(required) {
            if course_code.is_empty() {
                return Err(RegistrarError::invalid(ErrorCode::CourseCodeRequired));
            }
            if self.code_owner(&course_code).await?.is_some_and(|owner| owner != course_id) {
                return Err(RegistrarError::duplicate("Course code already exists."));
            }
            course.course_code = course_code;
        }
        if patch.course_description.is_some() {
            course.course_description = optional(patch.course_description.as_deref());
        }

        let written: Result<()> = async {
            checked!(
                self.db
                    .query(format!(
                        "UPDATE {COURSE} SET
                        course_code = $course_code,
                        course_name = $course_name,
                        course_description = $course_description
                    WHERE course_id = $course_id"
                    ))
                    .bind(("course_id", course_id))
                    .bind(("course_code", course.course_code.clone()))
                    .bind(("course_name", course.course_name.clone()))
                    .bind(("course_description", course.course_description.clone()))
            );
            Ok(())
        }
        .await;
        if let Err(err) = written {
            return Err(self.course_rejection(err, &course).await);
        }

        Ok(course)
    }

    /// Deletes the course's enrollments, then the course, in one transaction.
    ///
    /// # Errors
    /// [`RegistrarError::NotFound`] if the course does not exist.
    #[instrument(skip(self))]
    pub async fn delete_course(&self, course_id: i64) -> Result<()> {
        self.course(course_id).await?;
        checked!(
            self.db
                .query(format!(
                    "BEGIN TRANSACTION;
                    DELETE {ENROLLMENT} WHERE course_id = $course_id;
                    DELETE {COURSE} WHERE course_id = $course_id;
                    COMMIT TRANSACTION;"
                ))
                .bind(("course_id", course_id))
        );
        info!(course_id, "Course deleted");
        Ok(())
    }

    // --- Enrollments ---

    /// Adds a single enrollment. Enrolling twice in the same course is allowed.
    ///
    /// # Errors
    /// [`RegistrarError::NotFound`] with `ENROLLMENT002` for an unknown student
    /// or `ENROLLMENT001` for an unknown course.
    #[instrument(skip(self))]
    pub async fn enroll(&self, student_id: i64, course_id: i64) -> Result<Enrollment> {
        if self.find_student(student_id).await?.is_none() {
            return Err(RegistrarError::missing(ErrorCode::StudentMissing));
        }
        if self.find_course(course_id).await?.is_none() {
            return Err(RegistrarError::missing(ErrorCode::CourseMissing));
        }

        let enrollment =
            Enrollment { enrollment_id: self.next_id(ENROLLMENT).await?, student_id, course_id };

        let guard = courses_guard();
        let written: Result<()> = async {
            checked!(
                self.db
                    .query(format!(
                        "BEGIN TRANSACTION;
                    IF array::len((UPDATE {STUDENT} SET student_id = student_id
                        WHERE student_id = $student_id RETURN VALUE student_id)) = 0 {{
                        THROW 'ENROLLMENT002';
                    }};
                    {guard}
                    CREATE {ENROLLMENT} CONTENT {{
                        enrollment_id: $enrollment_id,
                        student_id: $student_id,
                        course_id: $course_id
                    }};
                    COMMIT TRANSACTION;"
                    ))
                    .bind(("enrollment_id", enrollment.enrollment_id))
                    .bind(("student_id", student_id))
                    .bind(("course_id", course_id))
                    .bind(("courses", vec![course_id]))
            );
            Ok(())
        }
        .await;
        if let Err(err) = written {
            if matches!(self.find_student(student_id).await, Ok(None)) {
                return Err(RegistrarError::missing(ErrorCode::StudentMissing));
            }
            if matches!(self.find_course(course_id).await, Ok(None)) {
                return Err(RegistrarError::missing(ErrorCode::CourseMissing));
            }
            return Err(err);
        }

        Ok(enrollment)
    }

    /// Removes the oldest enrollment of the pair. Returns `false` when there was none.
    ///
    /// # Errors
    /// Store failures only.
    #[instrument(skip(self))]
    pub async fn withdraw(&self, student_id: i64, course_id: i64) -> Result<bool> {
        let mut response = checked!(
            self.db
                .query(format!(
                    "SELECT VALUE enrollment_id FROM {ENROLLMENT}
                    WHERE student_id = $student_id AND course_id = $course_id"
                ))
                .bind(("student_id", student_id))
                .bind(("course_id", course_id))
        );
        let ids = response.take::<Vec<i64>>(0).map_err(RegistrarError::from_store)?;

        let Some(enrollment_id) = ids.into_iter().min() else {
            debug!("Nothing to withdraw");
            return Ok(false);
        };

        checked!(
            self.db
                .query(format!("DELETE {ENROLLMENT} WHERE enrollment_id = $enrollment_id"))
                .bind(("enrollment_id", enrollment_id))
        );

        info!(enrollment_id, "Enrollment withdrawn");
        Ok(true)
    }

    // --- Helpers ---

    /// Next value of the per-table counter. Ids are never reused.
    async fn next_id(&self, table: &'static str) -> Result<i64> {
        let mut response = checked!(self.db.query(format!(
            "UPSERT ONLY {COUNTER}:{table} SET seq += 1 RETURN VALUE seq"
        )));
        response
            .take::<Option<i64>>(0)
            .map_err(RegistrarError::from_store)?
            .ok_or_else(|| RegistrarError::from(format!("Counter {table} returned no value")))
    }

    async fn find_student(&self, student_id: i64) -> Result<Option<Student>> {
        Ok(self.students_by_id(&[student_id]).await?.into_iter().next())
    }

    async fn find_course(&self, course_id: i64) -> Result<Option<Course>> {
        Ok(self.courses_by_id(&[course_id]).await?.into_iter().next())
    }

    async fn students_by_id(&self, ids: &[i64]) -> Result<Vec<Student>> {
        let mut response = checked!(
            self.db
                .query(format!("SELECT {STUDENT_FIELDS} FROM {STUDENT} WHERE student_id IN $ids"))
                .bind(("ids", ids.to_vec()))
        );
        response.take::<Vec<Student>>(0).map_err(RegistrarError::from_store)
    }

    async fn courses_by_id(&self, ids: &[i64]) -> Result<Vec<Course>> {
        let mut response = checked!(
            self.db
                .query(format!("SELECT {COURSE_FIELDS} FROM {COURSE} WHERE course_id IN $ids"))
                .bind(("ids", ids.to_vec()))
        );
        response.take::<Vec<Course>>(0).map_err(RegistrarError::from_store)
    }

    async fn enrollments_where(&self, field: &'static str, id: i64) -> Result<Vec<Enrollment>> {
        let mut response = checked!(
            self.db
                .query(format!(
                    "SELECT {ENROLLMENT_FIELDS} FROM {ENROLLMENT}
                    WHERE {field} = $id ORDER BY enrollment_id"
                ))
                .bind(("id", id))
        );
        response.take::<Vec<Enrollment>>(0).map_err(RegistrarError::from_store)
    }

    async fn roll_owner(&self, roll_number: &str) -> Result<Option<i64>> {
        let mut response = checked!(
            self.db
                .query(format!(
                    "SELECT VALUE student_id FROM {STUDENT} WHERE roll_number = $roll_number"
                ))
                .bind(("roll_number", roll_number.to_owned()))
        );
        let owners = response.take::<Vec<i64>>(0).map_err(RegistrarError::from_store)?;
        Ok(owners.into_iter().next())
    }

    async fn code_owner(&self, course_code: &str) -> Result<Option<i64>> {
        let mut response = checked!(
            self.db
                .query(format!(
                    "SELECT VALUE course_id FROM {COURSE} WHERE course_code = $course_code"
                ))
                .bind(("course_code", course_code.to_owned()))
        );
        let owners = response.take::<Vec<i64>>(0).map_err(RegistrarError::from_store)?;
        Ok(owners.into_iter().next())
    }

    /// Precise error for a rejected student write: the roll number was taken by
    /// another writer, or a course vanished after validation.
    async fn student_rejection(
        &self,
        err: RegistrarError,
        student: &Student,
        course_ids: &[i64],
    ) -> RegistrarError {
        if let Ok(Some(owner)) = self.roll_owner(&student.roll_number).await
            && owner != student.student_id
        {
            warn!(student_id = student.student_id, "Roll number taken concurrently");
            return RegistrarError::duplicate("Roll number already exists.");
        }
        match self.ensure_courses_exist(course_ids).await {
            Err(missing @ RegistrarError::NotFound { .. }) => missing,
            _ => err,
        }
    }

    async fn course_rejection(&self, err: RegistrarError, course: &Course) -> RegistrarError {
        match self.code_owner(&course.course_code).await {
            Ok(Some(owner)) if owner != course.course_id => {
                warn!(course_id = course.course_id, "Course code taken concurrently");
                RegistrarError::duplicate("Course code already exists.")
            },
            _ => err,
        }
    }

    async fn ensure_courses_exist(&self, course_ids: &[i64]) -> Result<()> {
        if course_ids.is_empty() {
            return Ok(());
        }
        let found = self.courses_by_id(course_ids).await?;
        match course_ids.iter().find(|id| !found.iter().any(|c| c.course_id == **id)) {
            Some(missing) => Err(RegistrarError::NotFound {
                code: Some(ErrorCode::CourseMissing),
                message: ErrorCode::CourseMissing.message().into(),
                context: Some(format!("course_id {missing}").into()),
            }),
            None => Ok(()),
        }
    }
}
