pub mod users;

pub mod classes;

pub mod assignments;

pub mod submissions;

pub mod students;

pub mod grades;

pub use assignments::configure_assignments_routes;
pub use classes::configure_classes_routes;
pub use grades::configure_grades_routes;
pub use students::configure_students_routes;
pub use submissions::configure_submissions_routes;
pub use users::configure_user_routes;
