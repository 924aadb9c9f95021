use std::collections::HashMap;
use std::io;
use std::sync::{mpsc, Arc};
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Local};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::runtime::Handle;

use crate::api::{self, TaskBackend};
use crate::models::{Language, Task, TaskDraft};
use crate::translate::Translator;

/// Completion of a background network call, applied on the UI thread.
pub enum Completion {
    /// A plain list fetch, or a delete followed by its list fetch.
    Refreshed(Result<Vec<Task>, String>),
    /// A create/update followed by its list fetch. Success clears the
    /// draft and the edit target.
    Saved(Result<Vec<Task>, String>),
    /// A translation result. Never an error: failures already fell back
    /// to the original text inside the translator.
    Translated { id: String, text: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Owner,
    Description,
    Completed,
}

impl FormField {
    fn next(self) -> FormField {
        match self {
            FormField::Name => FormField::Owner,
            FormField::Owner => FormField::Description,
            FormField::Description => FormField::Completed,
            FormField::Completed => FormField::Name,
        }
    }

    fn previous(self) -> FormField {
        match self {
            FormField::Name => FormField::Completed,
            FormField::Owner => FormField::Name,
            FormField::Description => FormField::Owner,
            FormField::Completed => FormField::Description,
        }
    }
}

pub struct App {
    api: Arc<dyn TaskBackend>,
    translator: Arc<dyn Translator>,
    rt: Handle,
    tx: mpsc::Sender<Completion>,
    rx: mpsc::Receiver<Completion>,

    pub tasks: Vec<Task>,
    pub draft: TaskDraft,
    pub editing_id: Option<String>,
    pub loading: bool,
    pub language: Language,
    pub translations: HashMap<String, String>,
    pub translating_id: Option<String>,

    pub list_state: ListState,
    pub form_open: bool,
    pub form_focus: FormField,
    pub last_refreshed: Option<DateTime<Local>>,
    pub should_quit: bool,
}

impl App {
    pub fn new(api: Arc<dyn TaskBackend>, translator: Arc<dyn Translator>, rt: Handle) -> Self {
        let (tx, rx) = mpsc::channel();
        App {
            api,
            translator,
            rt,
            tx,
            rx,
            tasks: Vec::new(),
            draft: TaskDraft::default(),
            editing_id: None,
            loading: false,
            language: Language::default(),
            translations: HashMap::new(),
            translating_id: None,
            list_state: ListState::default(),
            form_open: false,
            form_focus: FormField::Name,
            last_refreshed: None,
            should_quit: false,
        }
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.list_state.selected().and_then(|i| self.tasks.get(i))
    }

    /// Cache entry for the task if one exists, else the raw description.
    pub fn displayed_description<'a>(&'a self, task: &'a Task) -> &'a str {
        self.translations
            .get(&task.id)
            .map(String::as_str)
            .unwrap_or(&task.description)
    }

    pub fn refresh(&mut self) {
        self.loading = true;
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        self.rt.spawn(async move {
            let result = api.list_tasks().await.map_err(|e| format!("{:#}", e));
            let _ = tx.send(Completion::Refreshed(result));
        });
    }

    pub fn submit(&mut self) {
        self.loading = true;
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        let draft = self.draft.clone();
        let editing_id = self.editing_id.clone();
        self.rt.spawn(async move {
            let result = api::submit_draft(api.as_ref(), editing_id.as_deref(), &draft)
                .await
                .map_err(|e| format!("{:#}", e));
            let _ = tx.send(Completion::Saved(result));
        });
    }

    pub fn delete_selected(&mut self) {
        let Some(id) = self.selected_task().map(|t| t.id.clone()) else {
            return;
        };
        self.loading = true;
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        self.rt.spawn(async move {
            let result = api::delete_and_refresh(api.as_ref(), &id)
                .await
                .map_err(|e| format!("{:#}", e));
            let _ = tx.send(Completion::Refreshed(result));
        });
    }

    /// Edit-and-resubmit with the completion flag flipped.
    pub fn toggle_selected(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        let mut draft = TaskDraft::from(task);
        draft.is_completed = !draft.is_completed;
        let id = task.id.clone();
        self.loading = true;
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        self.rt.spawn(async move {
            let result = api::submit_draft(api.as_ref(), Some(&id), &draft)
                .await
                .map_err(|e| format!("{:#}", e));
            let _ = tx.send(Completion::Saved(result));
        });
    }

    pub fn translate_selected(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        let id = task.id.clone();
        let text = task.description.clone();
        let lang = self.language;
        // A newer request takes over the marker; the older one still
        // completes and writes its cache entry.
        self.translating_id = Some(id.clone());
        let translator = Arc::clone(&self.translator);
        let tx = self.tx.clone();
        self.rt.spawn(async move {
            let translated = translator.translate(&text, lang).await;
            let _ = tx.send(Completion::Translated {
                id,
                text: translated,
            });
        });
    }

    pub fn open_form(&mut self) {
        self.draft = TaskDraft::default();
        self.editing_id = None;
        self.form_open = true;
        self.form_focus = FormField::Name;
    }

    pub fn edit_selected(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        let draft = TaskDraft::from(task);
        let editing_id = task.id.clone();
        self.draft = draft;
        self.editing_id = Some(editing_id);
        self.form_open = true;
        self.form_focus = FormField::Name;
    }

    pub fn cancel_form(&mut self) {
        self.form_open = false;
        self.draft = TaskDraft::default();
        self.editing_id = None;
    }

    pub fn cycle_language(&mut self) {
        // Selector change only; existing cache entries stay as they are.
        self.language = self.language.next();
    }

    pub fn next_item(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i >= self.tasks.len() - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn previous_item(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(0) | None => self.tasks.len() - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }

    /// Drain completions delivered since the last frame.
    pub fn poll_completions(&mut self) {
        while let Ok(completion) = self.rx.try_recv() {
            self.apply(completion);
        }
    }

    pub fn apply(&mut self, completion: Completion) {
        match completion {
            Completion::Refreshed(Ok(tasks)) => {
                self.tasks = tasks;
                self.loading = false;
                self.last_refreshed = Some(Local::now());
                self.clamp_selection();
            }
            Completion::Refreshed(Err(err)) => {
                log::error!("Task list fetch failed: {}", err);
                self.loading = false;
            }
            Completion::Saved(Ok(tasks)) => {
                self.draft = TaskDraft::default();
                self.editing_id = None;
                self.form_open = false;
                self.tasks = tasks;
                self.loading = false;
                self.last_refreshed = Some(Local::now());
                self.clamp_selection();
            }
            Completion::Saved(Err(err)) => {
                // The draft stays so the user can retry or cancel.
                log::error!("Saving task failed: {}", err);
                self.loading = false;
            }
            Completion::Translated { id, text } => {
                self.translations.insert(id, text);
                self.translating_id = None;
            }
        }
    }

    fn clamp_selection(&mut self) {
        if self.tasks.is_empty() {
            self.list_state.select(None);
        } else {
            match self.list_state.selected() {
                Some(i) if i < self.tasks.len() => {}
                _ => self.list_state.select(Some(0)),
            }
        }
    }

    fn form_input(&mut self, c: char) {
        match self.form_focus {
            FormField::Name => self.draft.name.push(c),
            FormField::Owner => self.draft.owner.push(c),
            FormField::Description => self.draft.description.push(c),
            FormField::Completed => {
                if c == ' ' {
                    self.draft.is_completed = !self.draft.is_completed;
                }
            }
        }
    }

    fn form_backspace(&mut self) {
        match self.form_focus {
            FormField::Name => {
                self.draft.name.pop();
            }
            FormField::Owner => {
                self.draft.owner.pop();
            }
            FormField::Description => {
                self.draft.description.pop();
            }
            FormField::Completed => {}
        }
    }

    fn draft_is_submittable(&self) -> bool {
        // Required-field check, same fields the browser form marked required.
        !self.draft.name.is_empty()
            && !self.draft.owner.is_empty()
            && !self.draft.description.is_empty()
    }
}

pub fn run_tui(mut app: App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    app.refresh();
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        app.poll_completions();
        terminal.draw(|f| ui(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if app.form_open {
                        handle_form_key(app, key);
                    } else {
                        handle_list_key(app, key);
                    }
                }
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

fn handle_list_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Down => {
            app.next_item();
        }
        KeyCode::Up => {
            app.previous_item();
        }
        KeyCode::Char('a') => {
            app.open_form();
        }
        KeyCode::Char('e') | KeyCode::Enter => {
            app.edit_selected();
        }
        KeyCode::Char('d') => {
            app.delete_selected();
        }
        KeyCode::Char('t') => {
            app.translate_selected();
        }
        KeyCode::Char('l') => {
            app.cycle_language();
        }
        KeyCode::Char(' ') => {
            app.toggle_selected();
        }
        KeyCode::Char('r') => {
            app.refresh();
        }
        _ => {}
    }
}

fn handle_form_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.cancel_form();
        }
        KeyCode::Tab | KeyCode::Down => {
            app.form_focus = app.form_focus.next();
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.form_focus = app.form_focus.previous();
        }
        KeyCode::Enter => {
            if app.draft_is_submittable() {
                app.submit();
            }
        }
        KeyCode::Backspace => {
            app.form_backspace();
        }
        KeyCode::Char(c) => {
            app.form_input(c);
        }
        _ => {}
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)].as_ref())
        .split(f.area());

    render_header(f, app, chunks[0]);
    render_tasks(f, app, chunks[1]);

    if app.form_open {
        render_form(f, app);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled(
            format!("Language: {} ({})", app.language.label(), app.language.code()),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw("  "),
    ];
    if app.loading {
        spans.push(Span::styled("loading…", Style::default().fg(Color::Yellow)));
    } else if let Some(at) = app.last_refreshed {
        spans.push(Span::styled(
            format!("refreshed {}", at.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let header = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title("lingodo"));
    f.render_widget(header, area);
}

fn render_tasks(f: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(area);

    let items: Vec<ListItem> = app
        .tasks
        .iter()
        .map(|task| {
            let status_color = if task.is_completed {
                Color::Green
            } else {
                Color::Red
            };
            let mut spans = vec![
                Span::styled("● ", Style::default().fg(status_color)),
                Span::styled(
                    format!("{} ", task.name),
                    Style::default().fg(Color::White),
                ),
                Span::styled(
                    format!("@{}", task.owner),
                    Style::default().fg(Color::DarkGray),
                ),
            ];
            if app.translating_id.as_deref() == Some(task.id.as_str()) {
                spans.push(Span::styled(
                    " [translating…]",
                    Style::default().fg(Color::Yellow),
                ));
            } else if app.translations.contains_key(&task.id) {
                spans.push(Span::styled(" 🌍", Style::default().fg(Color::Cyan)));
            }
            ListItem::new(vec![Line::from(spans)])
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Tasks"))
        .highlight_style(
            Style::default()
                .bg(Color::LightGreen)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ");

    f.render_stateful_widget(list, chunks[0], &mut app.list_state);

    let info_text = if let Some(task) = app.selected_task() {
        let status = if task.is_completed {
            "completed"
        } else {
            "open"
        };
        let translated_note = if app.translations.contains_key(&task.id) {
            " (translated)"
        } else {
            ""
        };
        format!(
            "Task: {}\nOwner: {}\nStatus: {}\n\nDescription{}:\n{}\n\nControls:\n• a: New task\n• e/Enter: Edit\n• Space: Toggle complete\n• d: Delete\n• t: Translate to {}\n• l: Switch language\n• r: Refresh\n• q: Quit",
            task.name,
            task.owner,
            status,
            translated_note,
            app.displayed_description(task),
            app.language.label(),
        )
    } else if app.loading {
        "Loading tasks…".to_string()
    } else {
        "No task selected\n\nControls:\n• ↑/↓: Navigate\n• a: New task\n• l: Switch language\n• r: Refresh\n• q: Quit".to_string()
    };

    let info = Paragraph::new(info_text)
        .block(Block::default().borders(Borders::ALL).title("Task Info"))
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(Color::White));

    f.render_widget(info, chunks[1]);
}

fn render_form(f: &mut Frame, app: &App) {
    let area = centered_rect(60, 50, f.area());
    let title = if app.editing_id.is_some() {
        "Edit Task"
    } else {
        "New Task"
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .style(Style::default().bg(Color::DarkGray));

    let field_line = |label: &str, value: String, field: FormField| {
        let style = if app.form_focus == field {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::White)
        };
        Line::from(vec![
            Span::styled(format!("{:<13}", label), Style::default().fg(Color::White)),
            Span::styled(value, style),
        ])
    };

    let completed = if app.draft.is_completed { "[x]" } else { "[ ]" };
    let lines = vec![
        Line::from(""),
        field_line("Name:", app.draft.name.clone(), FormField::Name),
        Line::from(""),
        field_line("Owner:", app.draft.owner.clone(), FormField::Owner),
        Line::from(""),
        field_line(
            "Description:",
            app.draft.description.clone(),
            FormField::Description,
        ),
        Line::from(""),
        field_line("Completed:", completed.to_string(), FormField::Completed),
        Line::from(""),
        Line::from(Span::styled(
            "Tab: next field • Space: toggle completed • Enter: save • Esc: cancel",
            Style::default().fg(Color::Gray),
        )),
    ];

    f.render_widget(Clear, area);
    let content = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    f.render_widget(content, area);
}

// Helper function to create centered rectangles for popups
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::thread;
    use std::time::Instant;
    use tokio::runtime::Runtime;

    /// In-memory backend that applies mutations so a re-list observes them,
    /// and records the order of calls.
    struct TestBackend {
        calls: Mutex<Vec<String>>,
        tasks: Mutex<Vec<Task>>,
    }

    impl TestBackend {
        fn with_tasks(tasks: Vec<Task>) -> Self {
            TestBackend {
                calls: Mutex::new(Vec::new()),
                tasks: Mutex::new(tasks),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TaskBackend for TestBackend {
        async fn list_tasks(&self) -> anyhow::Result<Vec<Task>> {
            self.calls.lock().unwrap().push("list".to_string());
            Ok(self.tasks.lock().unwrap().clone())
        }

        async fn create_task(&self, draft: &TaskDraft) -> anyhow::Result<()> {
            self.calls.lock().unwrap().push("create".to_string());
            let mut tasks = self.tasks.lock().unwrap();
            let id = format!("{}", tasks.len() + 1);
            tasks.push(Task {
                id,
                name: draft.name.clone(),
                description: draft.description.clone(),
                is_completed: draft.is_completed,
                owner: draft.owner.clone(),
            });
            Ok(())
        }

        async fn update_task(&self, id: &str, draft: &TaskDraft) -> anyhow::Result<()> {
            self.calls.lock().unwrap().push(format!("update {}", id));
            let mut tasks = self.tasks.lock().unwrap();
            if let Some(task) = tasks.iter_mut().find(|t| t.id == id) {
                task.name = draft.name.clone();
                task.description = draft.description.clone();
                task.is_completed = draft.is_completed;
                task.owner = draft.owner.clone();
            }
            Ok(())
        }

        async fn delete_task(&self, id: &str) -> anyhow::Result<()> {
            self.calls.lock().unwrap().push(format!("delete {}", id));
            self.tasks.lock().unwrap().retain(|t| t.id != id);
            Ok(())
        }

        async fn find_by_owner(&self, owner: &str) -> anyhow::Result<Option<Task>> {
            Ok(self
                .tasks
                .lock()
                .unwrap()
                .iter()
                .find(|t| t.owner == owner)
                .cloned())
        }
    }

    /// Translator returning a canned string, or echoing the input when no
    /// canned result is set (the shape a failed request collapses to).
    struct CannedTranslator {
        result: Option<String>,
    }

    #[async_trait]
    impl Translator for CannedTranslator {
        async fn translate(&self, text: &str, _lang: Language) -> String {
            self.result.clone().unwrap_or_else(|| text.to_string())
        }
    }

    fn report_task() -> Task {
        Task {
            id: "1".to_string(),
            name: "Write report".to_string(),
            description: "Finish the quarterly report".to_string(),
            is_completed: false,
            owner: "alice".to_string(),
        }
    }

    fn test_app(
        backend: Arc<TestBackend>,
        translator: CannedTranslator,
    ) -> (App, Runtime) {
        let rt = Runtime::new().unwrap();
        let app = App::new(backend, Arc::new(translator), rt.handle().clone());
        (app, rt)
    }

    /// Drain completions until no call is pending, with a deadline so a
    /// lost completion fails the test instead of hanging it.
    fn pump(app: &mut App) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            app.poll_completions();
            if !app.loading && app.translating_id.is_none() {
                return;
            }
            thread::sleep(Duration::from_millis(5));
        }
        panic!("background call never completed");
    }

    #[test]
    fn initial_load_fills_the_list_and_clears_loading() {
        let backend = Arc::new(TestBackend::with_tasks(vec![report_task()]));
        let (mut app, _rt) = test_app(backend, CannedTranslator { result: None });

        app.refresh();
        assert!(app.loading);
        pump(&mut app);

        assert!(!app.loading);
        assert_eq!(app.tasks.len(), 1);
        assert!(!app.tasks[0].is_completed);
        assert_eq!(app.list_state.selected(), Some(0));
        assert!(app.last_refreshed.is_some());
    }

    #[test]
    fn failed_refresh_clears_loading_and_keeps_the_list() {
        let backend = Arc::new(TestBackend::with_tasks(vec![report_task()]));
        let (mut app, _rt) = test_app(backend, CannedTranslator { result: None });
        app.refresh();
        pump(&mut app);

        app.apply(Completion::Refreshed(Err("connection refused".to_string())));

        assert!(!app.loading);
        assert_eq!(app.tasks.len(), 1);
    }

    #[test]
    fn edit_populates_the_draft_and_tracks_the_id() {
        let backend = Arc::new(TestBackend::with_tasks(vec![report_task()]));
        let (mut app, _rt) = test_app(backend, CannedTranslator { result: None });
        app.refresh();
        pump(&mut app);

        app.edit_selected();

        assert!(app.form_open);
        assert_eq!(app.editing_id.as_deref(), Some("1"));
        assert_eq!(app.draft.name, "Write report");
        assert_eq!(app.draft.description, "Finish the quarterly report");
        assert_eq!(app.draft.owner, "alice");
        assert!(!app.draft.is_completed);
    }

    #[test]
    fn submitting_an_edit_updates_that_id_then_relists() {
        let backend = Arc::new(TestBackend::with_tasks(vec![report_task()]));
        let (mut app, _rt) = test_app(Arc::clone(&backend), CannedTranslator { result: None });
        app.refresh();
        pump(&mut app);

        app.edit_selected();
        app.draft.description = "Finish and send the quarterly report".to_string();
        app.submit();
        pump(&mut app);

        assert_eq!(backend.calls(), vec!["list", "update 1", "list"]);
        assert_eq!(app.editing_id, None);
        assert!(!app.form_open);
        assert_eq!(app.draft, TaskDraft::default());
        assert_eq!(
            app.tasks[0].description,
            "Finish and send the quarterly report"
        );
    }

    #[test]
    fn submitting_a_new_draft_creates_then_relists() {
        let backend = Arc::new(TestBackend::with_tasks(Vec::new()));
        let (mut app, _rt) = test_app(Arc::clone(&backend), CannedTranslator { result: None });

        app.open_form();
        app.draft = TaskDraft {
            name: "Buy milk".to_string(),
            description: "Two liters".to_string(),
            is_completed: false,
            owner: "bob".to_string(),
        };
        app.submit();
        pump(&mut app);

        assert_eq!(backend.calls(), vec!["create", "list"]);
        assert_eq!(app.tasks.len(), 1);
        assert_eq!(app.tasks[0].name, "Buy milk");
    }

    #[test]
    fn delete_refreshes_the_list() {
        let backend = Arc::new(TestBackend::with_tasks(vec![report_task()]));
        let (mut app, _rt) = test_app(Arc::clone(&backend), CannedTranslator { result: None });
        app.refresh();
        pump(&mut app);

        app.delete_selected();
        pump(&mut app);

        assert_eq!(backend.calls(), vec!["list", "delete 1", "list"]);
        assert!(app.tasks.is_empty());
        assert_eq!(app.list_state.selected(), None);
    }

    #[test]
    fn toggle_marks_the_task_complete_through_an_update() {
        let backend = Arc::new(TestBackend::with_tasks(vec![report_task()]));
        let (mut app, _rt) = test_app(Arc::clone(&backend), CannedTranslator { result: None });
        app.refresh();
        pump(&mut app);

        app.toggle_selected();
        pump(&mut app);

        assert_eq!(backend.calls(), vec!["list", "update 1", "list"]);
        assert!(app.tasks[0].is_completed);
    }

    #[test]
    fn translate_caches_the_result_for_that_task() {
        let backend = Arc::new(TestBackend::with_tasks(vec![report_task()]));
        let (mut app, _rt) = test_app(
            backend,
            CannedTranslator {
                result: Some("Termina el informe trimestral".to_string()),
            },
        );
        app.language = Language::Spanish;
        app.refresh();
        pump(&mut app);

        app.translate_selected();
        assert_eq!(app.translating_id.as_deref(), Some("1"));
        pump(&mut app);

        assert_eq!(app.translating_id, None);
        assert_eq!(
            app.translations.get("1").map(String::as_str),
            Some("Termina el informe trimestral")
        );
        let task = app.tasks[0].clone();
        assert_eq!(
            app.displayed_description(&task),
            "Termina el informe trimestral"
        );
    }

    #[test]
    fn failed_translation_leaves_the_original_description() {
        let backend = Arc::new(TestBackend::with_tasks(vec![report_task()]));
        let (mut app, _rt) = test_app(backend, CannedTranslator { result: None });
        app.refresh();
        pump(&mut app);

        app.translate_selected();
        pump(&mut app);

        let task = app.tasks[0].clone();
        assert_eq!(
            app.displayed_description(&task),
            "Finish the quarterly report"
        );
    }

    #[test]
    fn translation_cache_is_keyed_per_task() {
        let other = Task {
            id: "2".to_string(),
            name: "Buy milk".to_string(),
            description: "Two liters".to_string(),
            is_completed: true,
            owner: "bob".to_string(),
        };
        let backend = Arc::new(TestBackend::with_tasks(vec![report_task(), other]));
        let (mut app, _rt) = test_app(
            backend,
            CannedTranslator {
                result: Some("Termina el informe trimestral".to_string()),
            },
        );
        app.refresh();
        pump(&mut app);

        app.list_state.select(Some(0));
        app.translate_selected();
        pump(&mut app);

        let untouched = app.tasks[1].clone();
        assert_eq!(app.displayed_description(&untouched), "Two liters");
    }

    #[test]
    fn cache_entry_survives_an_edit_of_the_description() {
        // Known staleness gap, preserved on purpose: editing does not
        // invalidate the translation.
        let backend = Arc::new(TestBackend::with_tasks(vec![report_task()]));
        let (mut app, _rt) = test_app(
            Arc::clone(&backend),
            CannedTranslator {
                result: Some("Termina el informe trimestral".to_string()),
            },
        );
        app.refresh();
        pump(&mut app);
        app.translate_selected();
        pump(&mut app);

        app.edit_selected();
        app.draft.description = "Something else entirely".to_string();
        app.submit();
        pump(&mut app);

        let task = app.tasks[0].clone();
        assert_eq!(
            app.displayed_description(&task),
            "Termina el informe trimestral"
        );
    }

    #[test]
    fn cancel_form_drops_the_draft_and_edit_target() {
        let backend = Arc::new(TestBackend::with_tasks(vec![report_task()]));
        let (mut app, _rt) = test_app(backend, CannedTranslator { result: None });
        app.refresh();
        pump(&mut app);

        app.edit_selected();
        app.cancel_form();

        assert!(!app.form_open);
        assert_eq!(app.editing_id, None);
        assert_eq!(app.draft, TaskDraft::default());
    }

    #[test]
    fn empty_required_fields_block_submission() {
        let backend = Arc::new(TestBackend::with_tasks(Vec::new()));
        let (mut app, _rt) = test_app(backend, CannedTranslator { result: None });
        app.open_form();
        app.draft.name = "Buy milk".to_string();
        assert!(!app.draft_is_submittable());
        app.draft.owner = "bob".to_string();
        app.draft.description = "Two liters".to_string();
        assert!(app.draft_is_submittable());
    }

    #[test]
    fn list_navigation_wraps_both_ways() {
        let other = Task {
            id: "2".to_string(),
            name: "Buy milk".to_string(),
            description: "Two liters".to_string(),
            is_completed: false,
            owner: "bob".to_string(),
        };
        let backend = Arc::new(TestBackend::with_tasks(vec![report_task(), other]));
        let (mut app, _rt) = test_app(backend, CannedTranslator { result: None });
        app.refresh();
        pump(&mut app);

        assert_eq!(app.list_state.selected(), Some(0));
        app.next_item();
        assert_eq!(app.list_state.selected(), Some(1));
        app.next_item();
        assert_eq!(app.list_state.selected(), Some(0));
        app.previous_item();
        assert_eq!(app.list_state.selected(), Some(1));
    }
}
