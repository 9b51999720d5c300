use clap::Parser;
use crossbeam::channel::{unbounded, Sender};
use log::LevelFilter;
use midiprobe::{
    classify,
    cli::{handle_device_list, validate_device, Args, Command},
    config::{default_settings_path, Settings},
    logging,
    midi::{DefaultMidiEngine, MidirEngine},
    monitor::{self, LogEntry, Monitor},
    parse_hex_message,
    ui::{self, SendPrompt, TerminalLog},
};
use std::error::Error;
use std::io::{self, BufRead};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

fn main() {
    let args = Args::parse();
    let settings = load_settings(&args);
    initialize_logging(settings.log_level);

    if args.device_list {
        list_available_devices(&handle_device_list());
        return;
    }

    let result = match args.command() {
        Command::Classify { bytes } => run_classify(&bytes),
        Command::Send { bytes } => run_send(&settings, &bytes),
        Command::Monitor => run_monitor(&settings),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn load_settings(args: &Args) -> Settings {
    let path = args.config.clone().or_else(default_settings_path);
    match Settings::load(path.as_deref()) {
        Ok(settings) => settings.apply_args(args),
        Err(e) => {
            eprintln!("Error reading settings: {}", e);
            std::process::exit(1);
        }
    }
}

fn initialize_logging(level: LevelFilter) {
    if let Err(e) = logging::init_logger(level) {
        logging::init_fallback_logger(level);
        log::warn!("File logging unavailable ({}), logging to stderr", e);
    }
    log::info!("Application starting");
}

fn list_available_devices(devices: &[String]) {
    println!("Available MIDI devices:");
    for device in devices {
        println!("  - {}", device);
    }
}

/// Picks the configured port, or asks the operator when none is configured.
fn resolve_port(
    configured: Option<&str>,
    prompt: &str,
    ports: Vec<String>,
) -> Result<Option<String>, Box<dyn Error>> {
    match configured {
        Some(name) => {
            validate_device(name, &ports)?;
            Ok(Some(name.to_string()))
        }
        None => Ok(ui::select_port(prompt, &ports)?),
    }
}

fn run_classify(tokens: &[String]) -> Result<bool, Box<dyn Error>> {
    let bytes = parse_hex_message(&tokens.join(" "))?;
    let result = classify(&bytes);
    println!("Status: {}", result.status_description);
    if !result.data_description.is_empty() {
        println!("Data:   {}", result.data_description);
    }
    println!("Valid:  {}", if result.valid { "yes" } else { "no" });
    Ok(result.valid)
}

fn run_send(settings: &Settings, tokens: &[String]) -> Result<bool, Box<dyn Error>> {
    let output = resolve_port(
        settings.output_device.as_deref(),
        "Output port",
        MidirEngine::output_port_names(),
    )?
    .ok_or("no MIDI output port selected")?;

    let engine = DefaultMidiEngine::new(None, Some(&output), settings.filter)?;
    let mut probe = Monitor::new(engine, Vec::<LogEntry>::new());
    let entry = probe.send_text(&tokens.join(" "))?;
    println!("{}", ui::format_entry(&entry));
    Ok(true)
}

fn run_monitor(settings: &Settings) -> Result<bool, Box<dyn Error>> {
    let input = resolve_port(
        settings.input_device.as_deref(),
        "Input port",
        MidirEngine::input_port_names(),
    )?
    .ok_or("no MIDI input port selected")?;
    if let Some(output) = &settings.output_device {
        validate_device(output, &MidirEngine::output_port_names())?;
    }

    let engine = DefaultMidiEngine::new(
        Some(&input),
        settings.output_device.as_deref(),
        settings.filter,
    )?;
    log::info!("Monitoring MIDI input: {}", input);

    let sending = settings.output_device.is_some();
    if sending {
        println!(
            "Monitoring {}. Press Enter to type a message, q then Enter to quit.",
            input
        );
    } else {
        println!("Monitoring {}. Press q then Enter to quit.", input);
    }

    let (tx, rx) = unbounded();
    let running = Arc::new(AtomicBool::new(true));
    let terminal = TerminalLog::new(&input);
    let sender = sending.then(|| (tx, terminal.send_prompt()));
    spawn_console(sender, Arc::clone(&running));

    let mut probe = Monitor::new(engine, terminal);
    let result = monitor::run_monitor(&mut probe, &rx, &running);
    probe.sink().finish();
    result?;
    Ok(true)
}

/// Reads operator lines from stdin. `q` or end of input clears `running`.
/// With an output port, Enter opens the send prompt.
fn spawn_console(
    sender: Option<(Sender<monitor::Command>, SendPrompt)>,
    running: Arc<AtomicBool>,
) {
    thread::spawn(move || {
        let stdin = io::stdin();
        let mut line = String::new();
        loop {
            line.clear();
            match stdin.lock().read_line(&mut line) {
                Ok(0) => break,
                Ok(_) if line.trim() == "q" => break,
                Ok(_) => {}
                Err(e) => {
                    log::error!("Reading stdin failed: {}", e);
                    break;
                }
            }
            let Some((tx, prompt)) = &sender else {
                continue;
            };
            match prompt.read_message() {
                Ok(text) if text.trim().is_empty() => {}
                Ok(text) => {
                    if tx.send(monitor::Command::Send(text)).is_err() {
                        return;
                    }
                }
                Err(e) => {
                    log::error!("Prompt failed: {}", e);
                    break;
                }
            }
        }
        running.store(false, Ordering::SeqCst);
    });
}
