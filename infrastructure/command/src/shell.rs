use async_trait::async_trait;
use domain_submission::service::{CommandOutput, CommandRunner, ShellCommand};
use tokio::process::Command;

/// Runs command lines through `<shell> -c`.
#[derive(Debug, Clone)]
pub struct ShellCommandRunner {
    shell: String,
}

impl ShellCommandRunner {
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }
}

impl Default for ShellCommandRunner {
    fn default() -> Self {
        Self::new("/bin/sh")
    }
}

#[async_trait]
impl CommandRunner for ShellCommandRunner {
    async fn run(&self, command: &ShellCommand) -> anyhow::Result<CommandOutput> {
        let mut child = Command::new(&self.shell);
        child.arg("-c").arg(&command.line);
        if let Some(dir) = &command.working_dir {
            child.current_dir(dir);
        }
        let out = child.output().await?;
        Ok(CommandOutput {
            status: out.status.code(),
            stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        })
    }
}
