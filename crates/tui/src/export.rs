//! HTML transcript export.
//!
//! Writes the current conversation to a standalone HTML file. Assistant
//! turns go through the markdown renderer; user turns are escaped and
//! line-broken, so only the agent's markup is interpreted.

use std::path::PathBuf;

use nebula_protocol::{ChatRole, ChatTurn};

/// File name of the exported transcript, written to the temp directory.
const EXPORT_FILE: &str = "nebula-transcript.html";

/// Renders the transcript as a standalone HTML document.
#[must_use]
pub fn transcript_html(turns: &[ChatTurn]) -> String {
    let mut body = String::new();
    for turn in turns {
        let (class, speaker, content) = match turn.role {
            ChatRole::User => ("user", "You", escape_html(&turn.text).replace('\n', "<br>")),
            ChatRole::Assistant => ("assistant", "Nebula", nebula_markdown::render(&turn.text)),
        };

        body.push_str(&format!(
            "    <div class=\"turn {class}\">\n\
             \u{20}\u{20}\u{20}\u{20}\u{20}\u{20}<div class=\"meta\">{speaker} · {}</div>\n\
             \u{20}\u{20}\u{20}\u{20}\u{20}\u{20}<div class=\"bubble\">{content}</div>\n\
             \u{20}\u{20}\u{20}\u{20}</div>\n",
            turn.timestamp.format("%Y-%m-%d %H:%M"),
        ));
    }

    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         \u{20}\u{20}<meta charset=\"utf-8\">\n\
         \u{20}\u{20}<title>Nebula transcript</title>\n\
         \u{20}\u{20}<style>\n\
         \u{20}\u{20}\u{20}\u{20}body {{ font-family: sans-serif; max-width: 48rem; margin: 2rem auto; }}\n\
         \u{20}\u{20}\u{20}\u{20}.turn {{ margin: 1rem 0; }}\n\
         \u{20}\u{20}\u{20}\u{20}.meta {{ color: #888; font-size: 0.8rem; }}\n\
         \u{20}\u{20}\u{20}\u{20}.bubble {{ padding: 0.5rem 0.75rem; border-radius: 0.5rem; }}\n\
         \u{20}\u{20}\u{20}\u{20}.user .bubble {{ background: #e8f0fe; }}\n\
         \u{20}\u{20}\u{20}\u{20}.assistant .bubble {{ background: #f4f4f4; }}\n\
         \u{20}\u{20}\u{20}\u{20}pre {{ background: #222; color: #eee; padding: 0.5rem; overflow-x: auto; }}\n\
         \u{20}\u{20}</style>\n\
         </head>\n\
         <body>\n\
         \u{20}\u{20}<h1>Nebula transcript</h1>\n{body}</body>\n\
         </html>\n"
    )
}

/// Writes the transcript to the temp directory and returns its path.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_transcript(turns: &[ChatTurn]) -> std::io::Result<PathBuf> {
    let path = std::env::temp_dir().join(EXPORT_FILE);
    std::fs::write(&path, transcript_html(turns))?;
    Ok(path)
}

/// Minimal HTML escaping for user-authored text.
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
