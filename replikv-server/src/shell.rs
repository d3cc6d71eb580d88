use replikv_http::KvClient;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

pub const HELP: &str = "Commands: put/get/list/exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Put { key: String, value: String },
    Get { key: String },
    List,
    Exit,
    /// Blank line, nothing to do.
    Empty,
    /// Known command with missing arguments; carries its usage line.
    Usage(&'static str),
    Help,
}

/// Parse one shell line. Values may contain spaces: everything after the key
/// is joined back with single spaces.
pub fn parse_command(line: &str) -> Command {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let Some(op) = parts.first() else {
        return Command::Empty;
    };

    match op.to_lowercase().as_str() {
        "exit" | "quit" => Command::Exit,
        "put" if parts.len() < 3 => Command::Usage("Usage: put <key> <value>"),
        "put" => Command::Put {
            key: parts[1].to_string(),
            value: parts[2..].join(" "),
        },
        "get" if parts.len() < 2 => Command::Usage("Usage: get <key>"),
        "get" => Command::Get {
            key: parts[1].to_string(),
        },
        "list" => Command::List,
        _ => Command::Help,
    }
}

/// Read commands from `input` until EOF or `exit`, writing results to `out`.
/// Request failures are printed and the loop continues.
pub async fn run<R, W>(client: &KvClient, input: R, out: &mut W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_command(&line) {
            Command::Exit => break,
            Command::Empty => {}
            Command::Usage(usage) => writeln!(out, "{}", usage)?,
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Put { key, value } => match client.put(&key, &value).await {
                Ok(ack) if ack.ok => writeln!(out, "{}", replikv::MSG_STORED_AND_REPLICATED)?,
                Ok(ack) => writeln!(out, "{}", ack.message)?,
                Err(e) => writeln!(out, "error: {}", e)?,
            },
            Command::Get { key } => match client.get(&key).await {
                Ok(value) => writeln!(out, "{} = {}", key, value)?,
                Err(e) => writeln!(out, "error: {}", e)?,
            },
            Command::List => {
                // Entries are printed as their lines arrive; the first write
                // error is kept and returned once the stream is done.
                let mut write_err: Option<std::io::Error> = None;
                let result = client
                    .list_each(|entry| {
                        if write_err.is_none() {
                            if let Err(e) = writeln!(out, "{} = {}", entry.key, entry.value)
                                .and_then(|_| out.flush())
                            {
                                write_err = Some(e);
                            }
                        }
                    })
                    .await;
                if let Some(e) = write_err {
                    return Err(e);
                }
                if let Err(e) = result {
                    writeln!(out, "error: {}", e)?;
                }
            }
        }
    }
    Ok(())
}
