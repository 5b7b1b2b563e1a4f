use serde::Serialize;

/// How command results are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn from_flag(json: bool) -> Self {
        if json { OutputMode::Json } else { OutputMode::Human }
    }

    pub fn is_human(&self) -> bool {
        matches!(self, OutputMode::Human)
    }
}

#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    ok: bool,
    command: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub fn success_json<T: Serialize>(command: &str, data: T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&Envelope {
        ok: true,
        command,
        data: Some(data),
        error: None,
    })
}

pub fn error_json(command: &str, message: &str) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&Envelope::<()> {
        ok: false,
        command,
        data: None,
        error: Some(message.to_string()),
    })
}

/// Print a success envelope when in JSON mode
pub fn emit_success<T: Serialize>(mode: OutputMode, command: &str, data: T) -> serde_json::Result<()> {
    if mode == OutputMode::Json {
        println!("{}", success_json(command, data)?);
    }
    Ok(())
}
