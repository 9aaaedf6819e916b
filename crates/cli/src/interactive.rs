use anyhow::Result;
use serve::Inferencer;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::info;

/// Ask for a text and an entity type until an empty text or end of input.
pub async fn run<R, W>(inferencer: &Inferencer, input: R, mut output: W, show_prompt: bool) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut answered = 0;

    loop {
        output.write_all(b"Input text: ").await?;
        output.flush().await?;
        let text = lines.next_line().await?;

        let entity_type = match text {
            Some(_) => {
                output.write_all(b"Input entity type: ").await?;
                output.flush().await?;
                lines.next_line().await?
            }
            None => None,
        };

        // End of input before both lines were read counts as an empty text.
        let (text, entity_type) = match (text, entity_type) {
            (Some(text), Some(entity_type)) => (text, entity_type),
            _ => (String::new(), String::new()),
        };

        if text.trim().is_empty() {
            output.write_all(b"Exit...\n").await?;
            output.flush().await?;
            break;
        }

        let answer = inferencer.ask(&text, entity_type.trim()).await?;
        if show_prompt {
            output.write_all(answer.prompt.as_bytes()).await?;
            output.write_all(b"\n").await?;
        }
        output.write_all(answer.response.as_bytes()).await?;
        output.write_all(b"\n").await?;
        output.flush().await?;
        answered += 1;
    }

    info!(answered, "Interactive session finished");
    Ok(answered)
}
