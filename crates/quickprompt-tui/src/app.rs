use std::path::PathBuf;
use std::sync::Arc;

use quickprompt_core::request::{DEFAULT_PROMPT, MAX_TEMPERATURE, MIN_TEMPERATURE};
use quickprompt_core::{
    validate, CompletionBackend, CompletionResult, CompletionWorkflow, Credential, OpenAIClient,
    RequestConfig, RequestPhase, Settings, UpstreamError,
};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

pub const MIN_MAX_TOKENS: u32 = 50;
pub const MAX_MAX_TOKENS: u32 = 2000;
pub const MAX_TOKENS_STEP: u32 = 50;
pub const TEMPERATURE_STEP: f32 = 0.1;

/// Builds the backend for one submission. Called on the blocking worker,
/// so the HTTP client never lives on the event loop thread.
pub type BackendFactory =
    Arc<dyn Fn() -> Result<Box<dyn CompletionBackend + Send>, UpstreamError> + Send + Sync>;

pub fn openai_backend_factory(settings: Settings) -> BackendFactory {
    Arc::new(move || {
        let client = OpenAIClient::from_settings(&settings)?;
        Ok(Box::new(client) as Box<dyn CompletionBackend + Send>)
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    ApiKey,
    Prompt,
    Temperature,
    MaxTokens,
    Output,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::ApiKey => Focus::Temperature,
            Focus::Temperature => Focus::MaxTokens,
            Focus::MaxTokens => Focus::Prompt,
            Focus::Prompt => Focus::Output,
            Focus::Output => Focus::ApiKey,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Focus::ApiKey => Focus::Output,
            Focus::Temperature => Focus::ApiKey,
            Focus::MaxTokens => Focus::Temperature,
            Focus::Prompt => Focus::MaxTokens,
            Focus::Output => Focus::Prompt,
        }
    }

    pub fn is_text(self) -> bool {
        matches!(self, Focus::ApiKey | Focus::Prompt)
    }
}

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Editable text with a cursor counted in chars.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    pub text: String,
    pub cursor: usize,
}

impl TextField {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.chars().count();
        Self { text, cursor }
    }

    pub fn insert_char(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.text, self.cursor);
        self.text.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn insert_str(&mut self, s: &str) {
        let byte_pos = char_to_byte_index(&self.text, self.cursor);
        self.text.insert_str(byte_pos, s);
        self.cursor += s.chars().count();
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = char_to_byte_index(&self.text, self.cursor);
            self.text.remove(byte_pos);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.text.chars().count() {
            let byte_pos = char_to_byte_index(&self.text, self.cursor);
            self.text.remove(byte_pos);
        }
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.text.chars().count());
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.text.chars().count();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// (line, column) of the cursor, both zero-based, for placing the terminal cursor
    pub fn cursor_line_col(&self) -> (usize, usize) {
        let before: String = self.text.chars().take(self.cursor).collect();
        let line = before.matches('\n').count();
        let col = before
            .rsplit('\n')
            .next()
            .map(|l| l.chars().count())
            .unwrap_or(0);
        (line, col)
    }
}

pub struct App {
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub focus: Focus,

    // Inputs
    pub api_key: TextField,
    pub prompt: TextField,
    pub temperature: f32,
    pub max_tokens: u32,

    // Output
    pub output: String,
    pub output_scroll: u16,
    pub status: String,

    // Request state
    pub phase: RequestPhase,
    pub request_task: Option<JoinHandle<CompletionResult>>,
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Popups
    pub show_about: bool,
    pub error_popup: Option<String>,

    pub settings: Settings,
    pub settings_path: Option<PathBuf>,
    backend_factory: BackendFactory,
}

impl App {
    pub fn new(
        settings: Settings,
        api_key: Option<Credential>,
        backend_factory: BackendFactory,
    ) -> Self {
        let temperature = settings.temperature().clamp(MIN_TEMPERATURE, MAX_TEMPERATURE);
        let max_tokens = settings.max_tokens().clamp(MIN_MAX_TOKENS, MAX_MAX_TOKENS);

        Self {
            should_quit: false,
            input_mode: InputMode::Normal,
            focus: if api_key.is_some() { Focus::Prompt } else { Focus::ApiKey },

            api_key: TextField::new(api_key.map(|k| k.expose().to_string()).unwrap_or_default()),
            prompt: TextField::new(DEFAULT_PROMPT),
            temperature,
            max_tokens,

            output: String::new(),
            output_scroll: 0,
            status: RequestPhase::Idle.status_text().to_string(),

            phase: RequestPhase::Idle,
            request_task: None,
            animation_frame: 0,

            show_about: false,
            error_popup: None,

            settings,
            settings_path: None,
            backend_factory,
        }
    }

    pub fn with_settings_path(mut self, path: PathBuf) -> Self {
        self.settings_path = Some(path);
        self
    }

    pub fn is_loading(&self) -> bool {
        self.phase.is_busy()
    }

    pub fn has_popup(&self) -> bool {
        self.show_about || self.error_popup.is_some()
    }

    pub fn close_popup(&mut self) {
        if self.error_popup.is_some() {
            self.error_popup = None;
        } else {
            self.show_about = false;
        }
    }

    /// The key as typed, minus surrounding whitespace
    pub fn credential(&self) -> Credential {
        Credential::new(self.api_key.text.trim())
    }

    pub fn request_config(&self) -> RequestConfig {
        RequestConfig::new(self.prompt.text.clone())
            .with_max_tokens(self.max_tokens)
            .with_temperature(self.temperature)
    }

    pub fn focused_field(&mut self) -> Option<&mut TextField> {
        match self.focus {
            Focus::ApiKey => Some(&mut self.api_key),
            Focus::Prompt => Some(&mut self.prompt),
            _ => None,
        }
    }

    pub fn adjust_temperature(&mut self, steps: i32) {
        let raw = self.temperature + TEMPERATURE_STEP * steps as f32;
        // Snap to one decimal so repeated steps don't drift
        self.temperature = ((raw * 10.0).round() / 10.0).clamp(MIN_TEMPERATURE, MAX_TEMPERATURE);
    }

    pub fn adjust_max_tokens(&mut self, steps: i32) {
        let raw = self.max_tokens as i64 + (MAX_TOKENS_STEP as i64) * steps as i64;
        self.max_tokens = raw.clamp(MIN_MAX_TOKENS as i64, MAX_MAX_TOKENS as i64) as u32;
    }

    pub fn clear_input(&mut self) {
        self.prompt.clear();
    }

    pub fn clear_output(&mut self) {
        self.output.clear();
        self.output_scroll = 0;
    }

    pub fn scroll_output_down(&mut self, lines: u16) {
        let max = self.output.lines().count().saturating_sub(1) as u16;
        self.output_scroll = self.output_scroll.saturating_add(lines).min(max);
    }

    pub fn scroll_output_up(&mut self, lines: u16) {
        self.output_scroll = self.output_scroll.saturating_sub(lines);
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.is_loading() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    /// Validate on the spot, then hand the request to a blocking worker.
    /// Does nothing while a request is already in flight.
    pub fn submit(&mut self) {
        if !self.phase.begin_validation() {
            return;
        }

        let credential = self.credential();
        let config = self.request_config();

        if let Err(e) = validate(&credential, &config) {
            warn!(error = %e, "submission rejected");
            self.apply_result(CompletionResult::Failure(e.to_string()));
            return;
        }

        self.phase.begin_request();
        self.status = self.phase.status_text().to_string();
        self.animation_frame = 0;
        // The previous answer must not pass for the answer to this prompt
        self.clear_output();
        info!(
            max_tokens = config.max_tokens,
            temperature = config.temperature,
            "submitting prompt"
        );

        let factory = Arc::clone(&self.backend_factory);
        self.request_task = Some(tokio::task::spawn_blocking(move || match factory() {
            Ok(backend) => CompletionWorkflow::new(backend).execute(credential, config),
            Err(e) => CompletionResult::Failure(e.to_string()),
        }));
    }

    /// Collect the worker's result once it is done. Cheap to call on every tick.
    pub async fn poll_request(&mut self) {
        let finished = self
            .request_task
            .as_ref()
            .is_some_and(|task| task.is_finished());
        if !finished {
            return;
        }

        if let Some(task) = self.request_task.take() {
            let result = match task.await {
                Ok(result) => result,
                Err(e) => {
                    error!(error = %e, "request worker failed");
                    CompletionResult::Failure(format!("Request worker failed: {}", e))
                }
            };
            self.apply_result(result);
        }
    }

    pub fn apply_result(&mut self, result: CompletionResult) {
        self.phase.finish();
        match result {
            CompletionResult::Success(text) => {
                self.output = text;
                self.output_scroll = 0;
                self.status = "Response generated successfully".to_string();
            }
            CompletionResult::Failure(message) => {
                self.error_popup = Some(message);
                self.status = "Error occurred".to_string();
            }
        }
    }

    /// Persist temperature and max tokens as the new defaults. The key is never written.
    pub fn save_defaults(&mut self) {
        let settings = Settings {
            temperature: Some(self.temperature),
            max_tokens: Some(self.max_tokens),
            ..self.settings.clone()
        };

        let saved = match &self.settings_path {
            Some(path) => settings.save_to(path).map(|_| path.clone()),
            None => settings.save(),
        };

        match saved {
            Ok(path) => {
                info!(path = %path.display(), "saved defaults");
                self.settings = settings;
                self.status = format!("Saved defaults to {}", path.display());
            }
            Err(e) => {
                error!(error = %e, "could not save defaults");
                self.error_popup = Some(format!("Could not save settings: {}", e));
            }
        }
    }
}
