pub mod admission;
pub mod job;
pub mod resource;
pub mod script;

#[rustfmt::skip]
pub use self::{
    admission::{AdmissionPolicy, Ceiling},
    job::{JobHandle, RunningSet},
    resource::{Directive, EnvVar, ResourceSpec},
    script::{CommandBody, JobScript},
};
