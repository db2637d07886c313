use std::{
    cell::Cell,
    io::{Write, stdout},
    path::PathBuf,
    rc::Rc,
    time::{Duration, Instant},
};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    ExecutableCommand, cursor,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    queue,
    style::Print,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use lcdmenu::{
    MenuController, MenuRenderer, MenuScreen,
    display::{FrameBuffer, FrameBufferDisplay, TerminalDisplay},
    event::command_for_key,
    item::{self, ItemWidget},
    render::{CharacterRenderer, GraphicalRenderer},
    widget::{WidgetBool, WidgetCharset, WidgetList, WidgetRange, charset::ALPHANUMERIC},
};

const PANEL_ORIGIN: (u16, u16) = (2, 1);
const PANEL_WIDTH: usize = 128;
const PANEL_HEIGHT: usize = 64;

#[derive(Parser, Debug)]
#[command(name = "lcdmenu", version, about = "Menu demo on an emulated LCD")]
struct Args {
    /// Rows of the character panel.
    #[arg(long, default_value_t = 4)]
    rows: usize,
    /// Columns of the character panel.
    #[arg(long, default_value_t = 20)]
    cols: usize,
    /// Emulate a 128x64 monochrome pixel panel instead.
    #[arg(long)]
    graphical: bool,
    /// Milliseconds between redraws of live entries.
    #[arg(long, default_value_t = 250)]
    poll_interval: u64,
    #[arg(long, default_value = "lcdmenu.log")]
    log_file: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let directory = args
        .log_file
        .parent()
        .map(PathBuf::from)
        .unwrap_or_default();
    let file_name = args
        .log_file
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("lcdmenu.log"));
    let (writer, _guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(
        directory, file_name,
    ));
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()))
        .with_writer(writer)
        .with_ansi(false)
        .init();

    info!("lcdmenu starting {:?}", args);

    terminal::enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;

    let result = if args.graphical {
        run_graphical(&args)
    } else {
        run_character(&args)
    };

    // Always restore terminal state, even if the menu failed
    stdout()
        .execute(cursor::Show)?
        .execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;

    info!("lcdmenu shutting down");
    result
}

fn run_character(args: &Args) -> Result<()> {
    let display = TerminalDisplay::new(stdout(), args.cols, args.rows, PANEL_ORIGIN);
    let renderer = CharacterRenderer::new(display, args.cols, args.rows);
    let mut menu = MenuController::new(renderer);
    build_menu(&mut menu);
    run(&mut menu, args.poll_interval, |_| Ok(()))
}

fn run_graphical(args: &Args) -> Result<()> {
    let renderer = GraphicalRenderer::new(FrameBufferDisplay::new(PANEL_WIDTH, PANEL_HEIGHT));
    let mut menu = MenuController::new(renderer);
    build_menu(&mut menu);
    let mut presented = usize::MAX;
    run(&mut menu, args.poll_interval, |renderer| {
        let display = renderer.display();
        if display.frames_sent() == presented {
            return Ok(());
        }
        presented = display.frames_sent();
        present(display.front())
    })
}

/// Draw a pixel panel with half blocks, two pixel rows per terminal row.
fn present(frame: &FrameBuffer) -> Result<()> {
    let mut out = stdout();
    let (x, y) = PANEL_ORIGIN;
    for row in 0..frame.height().div_ceil(2) {
        let line: String = (0..frame.width())
            .map(|col| match (frame.is_on(col, row * 2), frame.is_on(col, row * 2 + 1)) {
                (true, true) => '█',
                (true, false) => '▀',
                (false, true) => '▄',
                (false, false) => ' ',
            })
            .collect();
        queue!(out, cursor::MoveTo(x, y + row as u16), Print(line))?;
    }
    out.flush()?;
    Ok(())
}

fn run<R: MenuRenderer>(
    menu: &mut MenuController<R>,
    poll_interval: u64,
    mut present: impl FnMut(&R) -> Result<()>,
) -> Result<()> {
    stdout().execute(Clear(ClearType::All))?;
    menu.begin()?;
    present(menu.renderer())?;

    let tick = Duration::from_millis(poll_interval.clamp(10, 100));
    loop {
        if event::poll(tick)? {
            if let Event::Key(key_event) = event::read()? {
                let quit = key_event.kind == KeyEventKind::Press
                    && key_event.modifiers.contains(KeyModifiers::CONTROL)
                    && matches!(key_event.code, KeyCode::Char('c') | KeyCode::Char('q'));
                if quit {
                    break;
                }
                if let Some(command) = command_for_key(key_event) {
                    menu.process(command)?;
                }
            }
        }
        menu.poll(poll_interval)?;
        present(menu.renderer())?;
    }
    Ok(())
}

fn build_menu<R: MenuRenderer>(menu: &mut MenuController<R>) {
    let started = Instant::now();
    let beeps = Rc::new(Cell::new(0u32));
    let beep_count = Rc::clone(&beeps);

    let alarm = (
        WidgetRange::new(7u8, 1, 0, 23).cycle(true).format(|hour| format!("{hour:02}")),
        WidgetRange::new(30u8, 5, 0, 55)
            .cycle(true)
            .format(|minute| format!(":{minute:02}")),
    );
    let color = (WidgetList::new(vec!["Red", "Green", "Blue"], 0).cycle(true),);
    let contrast = (WidgetRange::new(60, 5, 0, 100).format(|level| format!("{level}%")),);
    let temperature = (
        WidgetRange::new(21.5f32, 0.5, 16.0, 28.0).format(|value| format!("{value:.1}")),
        WidgetBool::new(true).texts("C", "F"),
    );

    let main = MenuScreen::new(vec![
        item::label("Main menu"),
        item::submenu("Settings", 1),
        item::value("Uptime", move || format!("{}s", started.elapsed().as_secs())),
        item::value("Beeps", move || beep_count.get().to_string()),
        item::command("Beep", move || {
            beeps.set(beeps.get() + 1);
            info!("beep");
        }),
        item::input("Name", "LCD", |name| info!("name set to {name}")),
        item::input_charset("Code", "", ALPHANUMERIC, |code| info!("code set to {code}")),
        Box::new(
            ItemWidget::new("Alarm", alarm)
                .on_commit(|(hour, minute)| info!("alarm set to {hour:02}:{minute:02}")),
        ),
        Box::new(ItemWidget::new("Color", color).on_commit(|(index,)| info!("color {index}"))),
    ]);

    let settings = MenuScreen::new(vec![
        item::back("Back"),
        Box::new(ItemWidget::new("Contrast", contrast).on_commit(|(level,)| info!("contrast {level}"))),
        item::toggle("Sound", false, |enabled| info!("sound {enabled}")),
        Box::new(
            ItemWidget::new("Temp", temperature)
                .on_commit(|(value, celsius)| info!("temperature {value} celsius={celsius}")),
        ),
        Box::new(
            ItemWidget::new("Grade", (WidgetCharset::new("ABCDF", Some(0)).cycle(true),))
                .on_commit(|(grade,)| info!("grade {grade:?}")),
        ),
        item::label("-- about --"),
        item::basic("lcdmenu demo"),
        item::basic("Esc goes back"),
    ]);

    menu.add_screen(main);
    menu.add_screen(settings);
}
