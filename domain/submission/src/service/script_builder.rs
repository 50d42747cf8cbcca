//! Renders LSF job scripts from resource parameters.
//!
//! Rendering is pure: identical inputs always give byte-identical output, so a
//! re-submission writes exactly the same document.

use indoc::formatdoc;

use crate::model::vo::{CommandBody, JobScript, ResourceSpec};

/// Log file pattern, `%J` is replaced by the scheduler with the job id.
pub const LOG_FILE_PATTERN: &str = "lsf_output-%J.log";

pub fn render_header(spec: &ResourceSpec) -> String {
    let mut header = formatdoc! {"
        #!/bin/bash

        # set python path
        export PYTHONPATH={python_path}

        # set NUMEXPR_MAX_THREADS
        export NUMEXPR_MAX_THREADS={threads}

        ",
        python_path = spec.python_path,
        threads = spec.max_worker_threads(),
    };
    if !spec.environment.is_empty() {
        header += "# environment overrides\n";
        for var in spec.environment.iter() {
            header += &format!("export {}={}\n", var.name, var.value);
        }
        header += "\n";
    }
    header += &formatdoc! {"
        # specify resources
        #BSUB -n {task_count}

        # max wallclock time
        #BSUB -ptl {max_time}:00

        # queue
        #BSUB -q {queue}

        # name and output
        #BSUB -J {job_name}
        #BSUB -o {LOG_FILE_PATTERN}
        #BSUB -e {LOG_FILE_PATTERN}
        ",
        task_count = spec.task_count,
        max_time = spec.max_time_hours,
        queue = spec.queue,
        job_name = spec.job_name,
    };
    if let Some(placement) = &spec.placement {
        header += &format!("#BSUB -m {placement}\n");
    }
    header += "\n# additional specs\n";
    header += &render_directives(spec);
    header += "\n\n";
    header
}

/// One `#BSUB` line per extra directive, in the order given.
fn render_directives(spec: &ResourceSpec) -> String {
    spec.extra_directives
        .iter()
        .map(|d| format!("#BSUB -{} {}", d.flag, d.value))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Header followed by the command body.
pub fn render(spec: &ResourceSpec, body: &CommandBody) -> JobScript {
    JobScript::new(render_header(spec), body)
}
