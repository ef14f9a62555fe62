use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use tokio::task::JoinHandle;

use codelancer_core::{ChatBot, PendingReply, Responder, Sender, APOLOGY};

/// Convert a character index to a byte index for UTF-8 safe string operations
pub fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// An answer being produced on a background task
pub struct ReplyTask {
    pub reply: PendingReply,
    pub handle: JoinHandle<String>,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub open: bool,

    // Conversation
    pub bot: ChatBot,
    pub reply_task: Option<ReplyTask>,

    // Input box
    pub input: String,
    pub cursor: usize, // cursor position in input, in chars

    // Canned-question shortcuts
    pub shortcut_state: ListState,

    // Chat scroll
    pub chat_scroll: u16,
    pub chat_height: u16, // Height of chat area for scroll calculations
    pub chat_width: u16,  // Width of chat area for wrap calculations

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Panel area for mouse hit-testing (updated during render)
    pub chat_area: Option<Rect>,
}

impl App {
    pub fn new(responder: Responder) -> Self {
        let mut shortcut_state = ListState::default();
        shortcut_state.select(Some(0));

        Self {
            should_quit: false,
            open: false,

            bot: ChatBot::new(responder),
            reply_task: None,

            input: String::new(),
            cursor: 0,

            shortcut_state,

            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,

            animation_frame: 0,

            chat_area: None,
        }
    }

    pub fn toggle_open(&mut self) {
        self.open = !self.open;
    }

    pub fn shows_shortcuts(&self) -> bool {
        self.bot.conversation().shows_shortcuts()
    }

    pub fn shortcuts(&self) -> Vec<String> {
        self.bot
            .responder()
            .faqs()
            .questions()
            .map(str::to_string)
            .collect()
    }

    pub fn selected_shortcut(&self) -> Option<String> {
        let idx = self.shortcut_state.selected()?;
        self.bot.responder().faqs().questions().nth(idx).map(str::to_string)
    }

    pub fn shortcut_nav_down(&mut self) {
        let len = self.bot.responder().faqs().len();
        if len == 0 {
            return;
        }
        let i = self.shortcut_state.selected().map_or(0, |i| (i + 1).min(len - 1));
        self.shortcut_state.select(Some(i));
    }

    pub fn shortcut_nav_up(&mut self) {
        let i = self.shortcut_state.selected().map_or(0, |i| i.saturating_sub(1));
        self.shortcut_state.select(Some(i));
    }

    /// Send `text` as the user's message and start answering it in the background
    pub fn send(&mut self, text: &str) {
        let Some(reply) = self.bot.submit(text) else {
            return;
        };

        let responder = self.bot.responder().clone();
        let question = reply.question.clone();
        let handle = tokio::spawn(async move { responder.respond(&question).await });

        // A task left over from before a reset is detached, not aborted
        self.reply_task = Some(ReplyTask { reply, handle });
        self.scroll_chat_to_bottom();
    }

    /// Send whatever is in the input box
    pub fn send_input(&mut self) {
        if self.input.trim().is_empty() {
            return;
        }
        if self.bot.is_awaiting() {
            return;
        }
        let text = std::mem::take(&mut self.input);
        self.cursor = 0;
        self.send(&text);
    }

    /// Deliver the background answer once it is ready
    pub async fn poll_reply(&mut self) {
        let finished = self
            .reply_task
            .as_ref()
            .is_some_and(|task| task.handle.is_finished());
        if !finished {
            return;
        }

        if let Some(task) = self.reply_task.take() {
            let answer = match task.handle.await {
                Ok(answer) => answer,
                Err(e) => {
                    tracing::warn!(error = %e, "reply task failed");
                    APOLOGY.to_string()
                }
            };
            if self.bot.deliver(&task.reply, answer) {
                self.scroll_chat_to_bottom();
            }
        }
    }

    /// Clear the transcript back to the greeting
    pub fn clear_chat(&mut self) {
        self.bot.reset();
        self.chat_scroll = 0;
        self.shortcut_state.select(Some(0));
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.bot.is_awaiting() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    pub fn scroll_chat_up(&mut self) {
        self.scroll_chat_up_by(1);
    }

    pub fn scroll_chat_down(&mut self) {
        self.scroll_chat_down_by(1);
    }

    pub fn scroll_chat_up_by(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_sub(lines);
    }

    /// Never past the point where the last line sits at the bottom
    pub fn scroll_chat_down_by(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_add(lines).min(self.bottom_scroll());
    }

    /// Scroll chat to bottom so the newest message (or "Typing...") is visible
    pub fn scroll_chat_to_bottom(&mut self) {
        self.chat_scroll = self.bottom_scroll();
    }

    /// Offset that puts the last transcript line on the last visible row
    fn bottom_scroll(&self) -> u16 {
        let visible_height = if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        };
        self.transcript_lines().saturating_sub(visible_height)
    }

    /// Rendered line count of the transcript, wrap included
    fn transcript_lines(&self) -> u16 {
        // Use actual chat width for wrap calculation, default to 50 if not set
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let mut total: usize = 0;
        for msg in self.bot.messages() {
            total += 1; // Sender line ("You:" or "Bot:")
            for line in msg.text.lines() {
                // Use character count, not byte length, for proper UTF-8 handling
                total += line.chars().count() / wrap_width + 1;
            }
            total += 1; // Blank line after message
        }

        if self.bot.is_awaiting() {
            total += 2; // "Bot:" + "Typing..."
        }

        u16::try_from(total).unwrap_or(u16::MAX)
    }

    pub fn last_sender(&self) -> Option<Sender> {
        self.bot.messages().last().map(|m| m.sender)
    }
}
