//! Renderer seam: turning a document body into a node tree.
//!
//! The Markdown renderer is an external program. It receives the body (front
//! matter already stripped) on stdin and prints the tree as JSON on stdout.

use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::process::{ChildStdin, Command, Stdio};
use std::thread;

use lesson_tree::{Node, TreeError};
use thiserror::Error;

/// Errors from rendering a single document.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The renderer program could not be started.
    #[error("Failed to start renderer {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    /// Talking to the running renderer failed.
    #[error("Renderer I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// The renderer exited unsuccessfully.
    #[error("Renderer exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
    /// The renderer output is not UTF-8.
    #[error("Renderer output is not valid UTF-8")]
    InvalidEncoding,
    /// The renderer output is not a node tree.
    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// Anything that can turn a document body into a tree.
pub trait Render {
    /// Render `body` into its root node.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if the body cannot be rendered.
    fn render(&self, body: &str) -> Result<Node, RenderError>;
}

impl<F> Render for F
where
    F: Fn(&str) -> Result<Node, RenderError>,
{
    fn render(&self, body: &str) -> Result<Node, RenderError> {
        self(body)
    }
}

/// Renders by running an external program once per document.
#[derive(Debug, Clone)]
pub struct CommandRenderer {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandRenderer {
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append a fixed argument passed on every invocation.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

impl Render for CommandRenderer {
    fn render(&self, body: &str) -> Result<Node, RenderError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| RenderError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        // Feed stdin on its own thread while stdout and stderr are drained, so
        // neither side can stall on a full pipe. The child is always waited on.
        let stdin = child.stdin.take();
        let (written, output) = thread::scope(|scope| {
            let writer = scope.spawn(move || write_body(stdin, body));
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|payload| std::panic::resume_unwind(payload));
            (written, output)
        });
        let output = output?;
        written?;
        if !output.status.success() {
            return Err(RenderError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        let text = String::from_utf8(output.stdout).map_err(|_| RenderError::InvalidEncoding)?;
        Ok(Node::from_json(&text)?)
    }
}

/// Write `body` and close the pipe so the renderer sees end of input.
///
/// A renderer that exits without reading all of its input is not an error
/// here; its exit status decides.
fn write_body(stdin: Option<ChildStdin>, body: &str) -> std::io::Result<()> {
    let Some(mut stdin) = stdin else {
        return Ok(());
    };
    match stdin.write_all(body.as_bytes()) {
        Err(e) if e.kind() != ErrorKind::BrokenPipe => Err(e),
        _ => Ok(()),
    }
}

#[cfg(all(test, unix))]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn shell(script: &str) -> CommandRenderer {
        CommandRenderer::new("sh").arg("-c").arg(script)
    }

    #[test]
    fn test_command_renderer_parses_output() {
        let renderer = shell(
            r#"cat >/dev/null; echo '{"type":"root","children":[{"type":"blockquote","attr":{"class":"callout"},"options":{"location":2}}]}'"#,
        );
        let root = renderer.render("> callout\n").unwrap();
        assert_eq!(root.kind, "root");
        assert_eq!(root.children[0].attribute("class"), Some("callout"));
        assert_eq!(root.children[0].location(), Some(2));
    }

    #[test]
    fn test_command_renderer_receives_body_on_stdin() {
        // Echo the body back inside a JSON string field.
        let renderer = shell(r#"printf '{"type":"%s"}' "$(cat)""#);
        let root = renderer.render("paragraph").unwrap();
        assert_eq!(root.kind, "paragraph");
    }

    #[test]
    fn test_command_renderer_streams_large_body() {
        // Well past a pipe buffer in both directions.
        let text = "x".repeat(300 * 1024);
        let body = format!(r#"{{"type":"root","text":"{text}"}}"#);
        let root = CommandRenderer::new("cat").render(&body).unwrap();
        assert_eq!(root.kind, "root");
        assert_eq!(root.extra["text"].as_str().map(str::len), Some(text.len()));
    }

    #[test]
    fn test_command_renderer_noisy_stderr_before_reading() {
        let renderer = shell(
            r#"head -c 200000 /dev/zero | tr '\0' w >&2; cat >/dev/null; echo '{"type":"root"}'"#,
        );
        let body = "line\n".repeat(50_000);
        let root = renderer.render(&body).unwrap();
        assert_eq!(root.kind, "root");
    }

    #[test]
    fn test_command_renderer_nonzero_exit() {
        let renderer = shell("cat >/dev/null; echo boom >&2; exit 3");
        let err = renderer.render("text").unwrap_err();
        match err {
            RenderError::Failed { stderr, .. } => assert_eq!(stderr, "boom"),
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn test_command_renderer_malformed_output() {
        let renderer = shell("cat >/dev/null; echo 'not a tree'");
        assert!(matches!(
            renderer.render("text"),
            Err(RenderError::Tree(_))
        ));
    }

    #[test]
    fn test_command_renderer_missing_program() {
        let renderer = CommandRenderer::new("/nonexistent/lesson-renderer");
        assert!(matches!(
            renderer.render("text"),
            Err(RenderError::Spawn { .. })
        ));
    }

    #[test]
    fn test_closure_renderer() {
        let renderer = |body: &str| -> Result<Node, RenderError> { Ok(Node::new(body)) };
        assert_eq!(renderer.render("root").unwrap().kind, "root");
    }
}
