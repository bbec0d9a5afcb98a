use crate::error::RegistrarError;
use crate::manager::EnrollmentManager;
use crate::model::{NewCourse, NewStudent};
use tracing::info;

const COURSES: [(&str, &str, &str); 4] = [
    ("CSE01", "MAD I", "Modern Application Development - I"),
    ("CSE02", "DBMS", "Database Management Systems"),
    ("CSE03", "PDSA", "Programming, Data Structures, and Algorithms using Python"),
    ("BST13", "BDM", "Business Data Management"),
];

/// Roll number, names and the codes of the courses taken.
const STUDENTS: [(&str, &str, &str, [&str; 2]); 3] = [
    ("21BCS001", "Alice", "Smith", ["CSE01", "CSE02"]),
    ("21BCS002", "Bob", "Johnson", ["CSE02", "CSE03"]),
    ("21BCS003", "Charlie", "Brown", ["CSE01", "BST13"]),
];

impl EnrollmentManager {
    /// Fills an empty store with the demo courses, students and enrollments.
    ///
    /// Returns `false` without touching anything when any student or course exists.
    ///
    /// # Errors
    /// Propagates failures of the individual create operations.
    pub async fn seed_demo(&self) -> Result<bool, RegistrarError> {
        if !self.list_students().await?.is_empty() || !self.list_courses().await?.is_empty() {
            return Ok(false);
        }

        let mut created = Vec::with_capacity(COURSES.len());
        for (code, name, description) in COURSES {
            let course = self
                .create_course(NewCourse {
                    course_code: code.to_owned(),
                    course_name: name.to_owned(),
                    course_description: Some(description.to_owned()),
                })
                .await?;
            created.push(course);
        }

        for (roll_number, first_name, last_name, codes) in STUDENTS {
            let course_ids = created
                .iter()
                .filter(|c| codes.contains(&c.course_code.as_str()))
                .map(|c| c.course_id)
                .collect();
            self.create_student(NewStudent {
                roll_number: roll_number.to_owned(),
                first_name: first_name.to_owned(),
                last_name: Some(last_name.to_owned()),
                course_ids,
            })
            .await?;
        }

        info!(courses = COURSES.len(), students = STUDENTS.len(), "Demo data seeded");
        Ok(true)
    }
}
