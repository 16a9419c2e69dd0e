mod app;
mod cli;
mod config;
mod logging;
mod print;

use anyhow::Context;
use app::App;
use config::Config;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, IsTerminal, stdout};
use std::process::ExitCode;
use std::time::Duration;
use vkinfo_core::{DiagnosticProvider, SearchSession};

fn main() -> anyhow::Result<ExitCode> {
    let args = cli::parse();

    let mut config = Config::load(args.config.as_deref())?;
    config.apply_args(&args);
    logging::init(
        config.log.level.as_deref(),
        config.log.file.as_deref(),
        !args.print,
    )?;

    let palette = config.highlight.palette()?;
    let provider = config.build_provider()?;
    log::info!("using provider {}", provider.describe());

    if args.print {
        let styled = args.color.enabled(io::stdout().is_terminal());
        return print::run(provider, &palette, args.query.as_deref(), styled);
    }

    let (session, notice) = SearchSession::open(provider);
    let mut app = App::new(session, palette);
    if let Some(notice) = notice {
        app.apply_notice(notice);
    }

    // Terminal setup
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, args.query.as_deref());

    // Restore the terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result.context("viewer failed")?;
    Ok(ExitCode::SUCCESS)
}

fn run_app<B: ratatui::backend::Backend, P: DiagnosticProvider>(
    terminal: &mut Terminal<B>,
    app: &mut App<P>,
    initial_query: Option<&str>,
) -> io::Result<()> {
    // The first frame sizes the viewport so the initial match can be scrolled into view.
    terminal.draw(|f| app.render(f))?;
    if let Some(query) = initial_query {
        app.submit(query);
    }

    loop {
        app.tick();
        terminal.draw(|f| app.render(f))?;

        if app.should_quit() {
            break;
        }

        if event::poll(Duration::from_millis(100))? {
            // Resize needs no handling beyond the redraw at the top of the loop.
            if let Event::Key(key) = event::read()? {
                app.handle_key_event(key);
            }
        }
    }

    Ok(())
}
