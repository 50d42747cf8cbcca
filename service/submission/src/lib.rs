mod admission;
mod submission;

pub use admission::AdmissionControllerImpl;
pub use submission::SubmissionServiceImpl;
