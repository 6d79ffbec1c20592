use std::io;
use std::rc::Rc;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};

use crate::editor::LineEditor;
use crate::error::StoreError;
use crate::models::{Focus, PopupMode, RowMode, Task, TaskId};
use crate::store::{Snapshot, TaskStore};

/// Screen controller. Owns the store for as long as the screen is mounted.
pub struct App {
    store: TaskStore,
    pub list_state: ListState,
    pub focus: Focus,
    pub input: LineEditor,
    pub row_mode: RowMode,
    pub popup_mode: PopupMode,
    pub should_quit: bool,
    last_seen: Snapshot,
}

impl App {
    pub fn new() -> Self {
        App::with_store(TaskStore::new())
    }

    pub fn with_store(mut store: TaskStore) -> Self {
        store.subscribe(|tasks: &Snapshot| {
            log::debug!("task list replaced, {} tasks", tasks.len());
        });
        let last_seen = store.snapshot();
        App {
            store,
            list_state: ListState::default(),
            focus: Focus::Input,
            input: LineEditor::new(),
            row_mode: RowMode::View,
            popup_mode: PopupMode::None,
            should_quit: false,
            last_seen,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        self.store.tasks()
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.list_state.selected().and_then(|i| self.store.tasks().get(i))
    }

    /// Keeps the selection inside the list whenever the store has
    /// published a new snapshot since the last check.
    fn sync_selection(&mut self) {
        let current = self.store.snapshot();
        if Rc::ptr_eq(&current, &self.last_seen) {
            return;
        }
        self.last_seen = current;

        let len = self.store.len();
        let selected = match self.list_state.selected() {
            _ if len == 0 => None,
            Some(i) if i >= len => Some(len - 1),
            Some(i) => Some(i),
            None => Some(0),
        };
        self.list_state.select(selected);

        if let Some(id) = self.row_mode.editing_id() {
            if self.store.get(id).is_none() {
                self.row_mode = RowMode::View;
            }
        }
    }

    pub fn next_item(&mut self) {
        let len = self.store.len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i >= len - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn previous_item(&mut self) {
        let len = self.store.len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }

    pub fn submit_input(&mut self) {
        if self.input.is_blank() {
            return;
        }
        match self.store.add(self.input.content()) {
            Ok(_) => self.input.clear(),
            Err(StoreError::DuplicateTitle { title }) => {
                self.popup_mode = PopupMode::DuplicateNotice(title);
            }
        }
    }

    pub fn toggle_selected(&mut self) {
        if let Some(id) = self.selected_task().map(|task| task.id) {
            self.store.toggle_done(id);
        }
    }

    pub fn start_editing(&mut self) {
        if let Some(task) = self.selected_task() {
            self.row_mode = RowMode::Editing {
                id: task.id,
                buffer: LineEditor::with_content(&task.title),
            };
        }
    }

    pub fn cancel_editing(&mut self) {
        self.row_mode = RowMode::View;
    }

    /// Applies the buffer even when it still equals the original title.
    pub fn submit_editing(&mut self) {
        if let RowMode::Editing { id, buffer } = std::mem::replace(&mut self.row_mode, RowMode::View) {
            log::debug!("row {} edit submitted, modified={}", id, buffer.is_dirty);
            self.store.edit_title(id, buffer.content());
        }
    }

    pub fn request_remove(&mut self) {
        let Some(id) = self.selected_task().map(|task| task.id) else {
            return;
        };
        if self.row_mode.editing_id() == Some(id) {
            return;
        }
        self.popup_mode = PopupMode::ConfirmRemove(id);
    }

    pub fn confirm_remove(&mut self, id: TaskId) {
        self.store.remove(id);
        self.close_popup();
    }

    pub fn close_popup(&mut self) {
        self.popup_mode = PopupMode::None;
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.popup_mode.clone() {
            PopupMode::DuplicateNotice(_) => self.close_popup(),
            PopupMode::ConfirmRemove(id) => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => self.confirm_remove(id),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => self.close_popup(),
                _ => {}
            },
            PopupMode::None => {
                if matches!(self.row_mode, RowMode::Editing { .. }) {
                    self.handle_row_edit_key(key);
                } else {
                    match self.focus {
                        Focus::Input => self.handle_input_key(key),
                        Focus::List => self.handle_list_key(key),
                    }
                }
            }
        }

        self.sync_selection();
    }

    fn handle_row_edit_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.submit_editing(),
            KeyCode::Esc => self.cancel_editing(),
            _ => {
                if let RowMode::Editing { buffer, .. } = &mut self.row_mode {
                    apply_edit_key(buffer, key);
                }
            }
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.submit_input(),
            KeyCode::Esc => self.input.clear(),
            KeyCode::Tab | KeyCode::BackTab => self.focus = Focus::List,
            _ => apply_edit_key(&mut self.input, key),
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab | KeyCode::BackTab => self.focus = Focus::Input,
            KeyCode::Down | KeyCode::Char('j') => self.next_item(),
            KeyCode::Up | KeyCode::Char('k') => self.previous_item(),
            KeyCode::Char(' ') => self.toggle_selected(),
            KeyCode::Char('e') => self.start_editing(),
            KeyCode::Char('d') | KeyCode::Delete => self.request_remove(),
            _ => {}
        }
    }
}

impl Default for App {
    fn default() -> Self {
        App::new()
    }
}

fn apply_edit_key(editor: &mut LineEditor, key: KeyEvent) {
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => editor.insert_char(c),
        KeyCode::Backspace => editor.delete_char(),
        KeyCode::Delete => editor.delete_forward(),
        KeyCode::Left => editor.move_cursor_left(),
        KeyCode::Right => editor.move_cursor_right(),
        KeyCode::Home => editor.move_to_start_of_line(),
        KeyCode::End => editor.move_to_end_of_line(),
        _ => {}
    }
}

pub fn run_tui() -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new();
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        log::error!("event loop failed: {err}");
    }
    log::info!("screen closed with {} tasks", app.tasks().len());

    res.map_err(Into::into)
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key);
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

fn task_counter(count: usize) -> String {
    match count {
        1 => "1 task".to_string(),
        n => format!("{n} tasks"),
    }
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

/// Renders the buffer with a block cursor when `show_cursor` is set.
fn editor_spans(editor: &LineEditor, style: Style, show_cursor: bool) -> Vec<Span<'static>> {
    if !show_cursor {
        return vec![Span::styled(editor.content().to_string(), style)];
    }

    let (before, under, after) = editor.split_at_cursor();
    let cursor_char = under.map(String::from).unwrap_or_else(|| " ".to_string());
    let mut spans = Vec::new();
    if !before.is_empty() {
        spans.push(Span::styled(before, style));
    }
    spans.push(Span::styled(cursor_char, Style::default().bg(Color::Cyan).fg(Color::Black)));
    if !after.is_empty() {
        spans.push(Span::styled(after, style));
    }
    spans
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(f.area());

    let header = Paragraph::new(Line::from(vec![
        Span::styled("todo", Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled(task_counter(app.tasks().len()), Style::default().fg(Color::Cyan)),
    ]))
    .block(Block::default().borders(Borders::ALL).style(Style::default().bg(Color::Rgb(136, 84, 208))));
    f.render_widget(header, chunks[0]);

    render_input(f, app, chunks[1]);
    render_tasks(f, app, chunks[2]);
    render_help(f, app, chunks[3]);

    match &app.popup_mode {
        PopupMode::DuplicateNotice(title) => {
            let text = format!("A task titled '{}' already exists.\n\nPress any key to dismiss", title);
            render_popup(f, "Task already registered", &text);
        }
        PopupMode::ConfirmRemove(id) => {
            let title = app
                .store
                .get(*id)
                .map(|task| task.title.clone())
                .unwrap_or_default();
            let text = format!("Remove '{}'?\n\ny: Yes    n: No", title);
            render_popup(f, "Remove task", &text);
        }
        PopupMode::None => {}
    }
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

fn render_popup(f: &mut Frame, title: &str, text: &str) {
    let popup_area = centered_rect(60, 30, f.area());
    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .style(Style::default().bg(Color::DarkGray));
    let content = Paragraph::new(text.to_string())
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(Color::White));

    f.render_widget(Clear, popup_area);
    f.render_widget(content, popup_area);
}

fn render_input(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Input && app.row_mode == RowMode::View;
    let spans = if app.input.content().is_empty() && !focused {
        vec![Span::styled("Add a new task...", Style::default().fg(Color::DarkGray))]
    } else {
        editor_spans(&app.input, Style::default().fg(Color::White), focused)
    };

    let input = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title("New task")
            .border_style(focus_style(focused)),
    );
    f.render_widget(input, area);
}

fn render_tasks(f: &mut Frame, app: &mut App, area: Rect) {
    let editing = app.row_mode.editing_id();
    let items: Vec<ListItem> = app
        .store
        .iter()
        .map(|task| {
            let (marker, title_style) = if task.done {
                (
                    Span::styled("[✓] ", Style::default().fg(Color::Green)),
                    Style::default().fg(Color::Green).add_modifier(Modifier::CROSSED_OUT),
                )
            } else {
                (
                    Span::styled("[ ] ", Style::default().fg(Color::Gray)),
                    Style::default().fg(Color::White),
                )
            };

            let mut spans = vec![marker];
            match &app.row_mode {
                RowMode::Editing { id, buffer } if *id == task.id => {
                    spans.extend(editor_spans(buffer, title_style, true));
                    spans.push(Span::styled("  [esc: cancel]", Style::default().fg(Color::DarkGray)));
                }
                _ => spans.push(Span::styled(task.title.clone(), title_style)),
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let focused = app.focus == Focus::List || editing.is_some();
    let tasks_list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Tasks")
                .border_style(focus_style(focused)),
        )
        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .highlight_symbol(">> ");

    f.render_stateful_widget(tasks_list, area, &mut app.list_state);
}

fn render_help(f: &mut Frame, app: &App, area: Rect) {
    let text = match (&app.row_mode, app.focus) {
        (RowMode::Editing { .. }, _) => "Enter: save • Esc: cancel",
        (RowMode::View, Focus::Input) => "Enter: add • Esc: clear • Tab: tasks • Ctrl+C: quit",
        (RowMode::View, Focus::List) => {
            "↑/↓: select • Space: done • e: edit • d: remove • Tab: input • q: quit"
        }
    };
    f.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}
