use serde::{Deserialize, Serialize};

/// Commands placed after the rendered header.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandBody {
    Single(String),
    /// Concatenated in order with no separator; each element carries its own
    /// line terminator.
    Sequence(Vec<String>),
}

impl CommandBody {
    pub fn write_to(&self, buf: &mut String) {
        match self {
            CommandBody::Single(cmd) => buf.push_str(cmd),
            CommandBody::Sequence(cmds) => cmds.iter().for_each(|cmd| buf.push_str(cmd)),
        }
    }
}

impl From<&str> for CommandBody {
    fn from(cmd: &str) -> Self {
        Self::Single(cmd.to_owned())
    }
}

impl From<String> for CommandBody {
    fn from(cmd: String) -> Self {
        Self::Single(cmd)
    }
}

impl From<Vec<String>> for CommandBody {
    fn from(cmds: Vec<String>) -> Self {
        Self::Sequence(cmds)
    }
}

/// A rendered job-description document: header followed by the command body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JobScript {
    content: String,
    header_len: usize,
}

impl JobScript {
    pub fn new(header: String, body: &CommandBody) -> Self {
        let header_len = header.len();
        let mut content = header;
        body.write_to(&mut content);
        Self {
            content,
            header_len,
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.content
    }

    #[inline]
    pub fn header(&self) -> &str {
        &self.content[..self.header_len]
    }

    #[inline]
    pub fn body(&self) -> &str {
        &self.content[self.header_len..]
    }
}
