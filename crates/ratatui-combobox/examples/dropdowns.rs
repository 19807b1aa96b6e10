use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableMouseCapture;
use crossterm::event::Event;
use crossterm::event::KeyCode;
use crossterm::event::KeyEventKind;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Constraint;
use ratatui::layout::Direction;
use ratatui::layout::Layout;
use ratatui::layout::Rect;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui_combobox::DropdownAction;
use ratatui_combobox::DropdownOptions;
use ratatui_combobox::OptionCatalog;
use ratatui_combobox::SelectOption;
use ratatui_combobox::engine::crossterm_input::input_event_from_crossterm;
use ratatui_combobox::engine::input::InputEvent;
use ratatui_combobox::country_picker::CountryPicker;
use ratatui_combobox::multi_select::MultiSelect;
use ratatui_combobox::select::Select;
use ratatui_combobox::theme::Theme;
use std::io;
use std::time::Duration;

struct App {
    fruit: Select<&'static str>,
    toppings: MultiSelect<&'static str>,
    phone: CountryPicker,
    focus: usize,
    status: String,
}

impl App {
    fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let fruit = Select::with_options(
            OptionCatalog::new(vec![
                SelectOption::new("apple", "Apple"),
                SelectOption::new("banana", "Banana"),
                SelectOption::new("cherry", "Cherry").disabled(),
                SelectOption::new("durian", "Durian"),
                SelectOption::new("elderberry", "Elderberry"),
            ])?,
            DropdownOptions {
                searchable: true,
                name: Some("fruit".to_string()),
                ..Default::default()
            },
        );
        let toppings = MultiSelect::with_options(
            OptionCatalog::new(vec![
                SelectOption::new("cream", "Cream"),
                SelectOption::new("honey", "Honey"),
                SelectOption::new("nuts", "Nuts").disabled(),
                SelectOption::new("oats", "Oats"),
                SelectOption::new("syrup", "Maple syrup"),
            ])?,
            DropdownOptions {
                searchable: true,
                name: Some("toppings".to_string()),
                ..Default::default()
            },
        )
        .with_default_value(["honey"]);
        let phone = CountryPicker::new()?.with_default_country("US");

        let mut app = Self {
            fruit,
            toppings,
            phone,
            focus: 0,
            status: String::new(),
        };
        app.apply_focus();
        Ok(app)
    }

    fn any_open(&self) -> bool {
        self.fruit.controller().is_open()
            || self.toppings.controller().is_open()
            || self.phone.controller().is_open()
    }

    fn apply_focus(&mut self) {
        self.fruit.controller_mut().set_focused(self.focus == 0);
        self.toppings.controller_mut().set_focused(self.focus == 1);
        self.phone.controller_mut().set_focused(self.focus == 2);
    }

    fn handle(&mut self, ev: InputEvent) {
        let fruit = self.fruit.handle_event(ev.clone());
        let toppings = self.toppings.handle_event(ev.clone());
        let phone = self.phone.handle_event(ev);

        if let DropdownAction::Changed { value, .. } = fruit {
            self.status = format!("fruit -> {:?}", value.values());
        }
        if let DropdownAction::Changed { value, .. } = toppings {
            self.status = format!("toppings -> {:?}", value.values());
        }
        if let DropdownAction::Changed { .. } = phone {
            self.status = format!("phone -> {}", self.phone.dial_code().unwrap_or_default());
        }

        // a trigger click focuses that dropdown
        let clicked = [
            self.fruit.controller().is_focused(),
            self.toppings.controller().is_focused(),
            self.phone.controller().is_focused(),
        ];
        if let Some(i) = (0..3).find(|&i| i != self.focus && clicked[i]) {
            self.focus = i;
            self.apply_focus();
        }
    }

    fn on_frame(&mut self) -> bool {
        let a = self.fruit.on_frame().needs_redraw();
        let b = self.toppings.on_frame().needs_redraw();
        let c = self.phone.on_frame().needs_redraw();
        a || b || c
    }

    fn render(&mut self, f: &mut ratatui::Frame<'_>, theme: &Theme) {
        let area = f.area();
        let [main, status] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .areas(area);

        let block = Block::default()
            .title("Dropdowns (Tab focus, Enter/Space open, Esc close, ^A/^D all/none, q quit)")
            .borders(Borders::ALL);
        let inner = block.inner(main);
        f.render_widget(block, main);

        let [left, mid, right] = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .areas(inner);
        let trigger = |col: Rect| Rect::new(col.x + 1, col.y + 1, col.width.saturating_sub(2), 1);

        let form = [
            self.fruit.controller().form_field(),
            self.toppings.controller().form_field(),
        ]
        .into_iter()
        .flatten()
        .map(|field| format!("{}={}", field.name, field.value))
        .collect::<Vec<_>>()
        .join("  ");
        let status_line = format!("{}  |  {form}", self.status);

        let frame = f.area();
        let buf = f.buffer_mut();
        buf.set_span(status.x, status.y, &Span::raw(status_line), status.width);
        self.fruit.render(trigger(left), frame, buf, theme);
        self.toppings.render(trigger(mid), frame, buf, theme);
        self.phone.render(trigger(right), frame, buf, theme);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut stdout = io::stdout();
    enable_raw_mode()?;
    crossterm::execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let theme = Theme::default();
    let res = App::new().and_then(|mut app| run(&mut terminal, &theme, &mut app).map_err(Into::into));

    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    res
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    theme: &Theme,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| app.render(f, theme))?;
        if app.on_frame() {
            continue;
        }

        if !crossterm::event::poll(Duration::from_millis(50))? {
            continue;
        }
        let ev = crossterm::event::read()?;
        if let Event::Key(key) = &ev {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if !app.any_open() {
                match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Tab => {
                        app.focus = (app.focus + 1) % 3;
                        app.apply_focus();
                        continue;
                    }
                    _ => {}
                }
            }
        }
        if let Some(ev) = input_event_from_crossterm(ev) {
            app.handle(ev);
        }
    }
}
