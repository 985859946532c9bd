use std::env;
use std::fs;
use std::process;

use fretboard::NamedTunings;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: fretboard <session.yaml> [output.txt]");
        eprintln!("       fretboard --tunings <saved.json> <session.yaml> [output.txt]");
        process::exit(1);
    }

    let mut saved: Option<NamedTunings> = None;
    let mut input_path = &args[1];
    let mut output_path: Option<&String> = args.get(2);

    // Parse flags
    if args[1] == "--tunings" {
        if args.len() < 4 {
            eprintln!("Usage: fretboard --tunings <saved.json> <session.yaml> [output.txt]");
            process::exit(1);
        }
        let store_path = &args[2];
        let json = match fs::read_to_string(store_path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", store_path, e);
                process::exit(1);
            }
        };
        match NamedTunings::from_json(&json) {
            Ok(store) => {
                log::info!("loaded {} saved tunings", store.names().count());
                saved = Some(store);
            }
            Err(e) => {
                eprintln!("Error in '{}': {}", store_path, e);
                process::exit(1);
            }
        }
        input_path = &args[3];
        output_path = args.get(4);
    }

    // Read input file
    let source = match fs::read_to_string(input_path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", input_path, e);
            process::exit(1);
        }
    };

    let text = match fretboard::render_session_with_tunings(&source, saved.as_ref()) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Session error: {}", e);
            process::exit(1);
        }
    };

    // Output
    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(path, &text) {
                eprintln!("Error writing to '{}': {}", path, e);
                process::exit(1);
            }
            eprintln!("Wrote fretboard to {}", path);
        }
        None => {
            println!("{}", text);
        }
    }
}
