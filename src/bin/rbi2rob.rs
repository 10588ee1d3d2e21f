// rbi2rob - decodes and disassembles RoboCom .rbi robot programs

use std::env;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::process;

use log::debug;
use rbidasm::{DecodeOptions, Disassembler};

fn print_usage(program: &str) {
    eprintln!("Use as: {} [-d] [-h] [-c <config.toml>] <rbi file>", program);
    eprintln!("  -d\tToggles decoding the hex dump. On by default; disassembly always decodes");
    eprintln!("  -h\tMake hex dump; does not disassemble instructions");
    eprintln!("  -c\tRead decode options from a TOML file (flags apply on top)");
}

/// What the command line asked for.
#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    toggle_decode: bool,
    hex_dump: bool,
    config_path: Option<String>,
    filename: Option<String>,
    help: bool,
}

/// Parse the arguments after the program name. Single-letter flags may be
/// grouped (`-dh`) and may follow the file name; the first non-flag argument
/// is the file.
fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut cli = CliArgs::default();

    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        match arg {
            "--help" => cli.help = true,
            "--config" => {
                i += 1;
                let path = args.get(i).ok_or("-c requires a filename")?;
                cli.config_path = Some(path.clone());
            }
            "-" => {
                cli.filename.get_or_insert_with(|| arg.to_string());
            }
            _ if arg.starts_with("--") => debug!("ignoring option {}", arg),
            _ if arg.starts_with('-') => {
                let flags = &arg[1..];
                for (pos, flag) in flags.char_indices() {
                    match flag {
                        'd' => cli.toggle_decode = !cli.toggle_decode,
                        'h' => cli.hex_dump = true,
                        'c' => {
                            // -cFILE or -c FILE
                            let rest = &flags[pos + 1..];
                            let path = if rest.is_empty() {
                                i += 1;
                                args.get(i).ok_or("-c requires a filename")?.clone()
                            } else {
                                rest.to_string()
                            };
                            cli.config_path = Some(path);
                            break;
                        }
                        // unknown flags are ignored
                        other => debug!("ignoring option -{}", other),
                    }
                }
            }
            _ => {
                cli.filename.get_or_insert_with(|| arg.to_string());
            }
        }
        i += 1;
    }
    Ok(cli)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("rbi2rob");

    let cli = match parse_args(args.get(1..).unwrap_or_default()) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
    if cli.help {
        print_usage(program);
        return Ok(());
    }

    let filename = match cli.filename {
        Some(f) => f,
        None => {
            print_usage(program);
            process::exit(1);
        }
    };

    let mut options = match cli.config_path {
        Some(path) => DecodeOptions::load(&path).unwrap_or_else(|e| {
            eprintln!("Error: {}: {}", path, e);
            process::exit(1);
        }),
        None => DecodeOptions::default(),
    };
    if cli.toggle_decode {
        options.decode = !options.decode;
    }
    options.hex_dump |= cli.hex_dump;
    debug!("options: {:?}", options);

    let file = match File::open(&filename) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Error: Cannot open RBI file '{}': {}", filename, e);
            process::exit(1);
        }
    };

    let program = match Disassembler::new(BufReader::new(file), options).run() {
        Ok(program) => program,
        Err(e) => {
            eprintln!("{}. Aborting.", e);
            process::exit(1);
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write!(out, "{}", program)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        parse_args(&args).unwrap()
    }

    #[test]
    fn test_separate_flags() {
        let cli = parse(&["-d", "-h", "robot.rbi"]);
        assert!(cli.toggle_decode);
        assert!(cli.hex_dump);
        assert_eq!(cli.filename.as_deref(), Some("robot.rbi"));
    }

    #[test]
    fn test_grouped_flags() {
        assert_eq!(parse(&["-dh", "robot.rbi"]), parse(&["-d", "-h", "robot.rbi"]));
        assert!(!parse(&["-dd", "robot.rbi"]).toggle_decode);
    }

    #[test]
    fn test_flags_after_filename() {
        let cli = parse(&["robot.rbi", "-h", "-c", "opts.toml"]);
        assert!(cli.hex_dump);
        assert_eq!(cli.filename.as_deref(), Some("robot.rbi"));
        assert_eq!(cli.config_path.as_deref(), Some("opts.toml"));
    }

    #[test]
    fn test_config_forms() {
        assert_eq!(parse(&["-copts.toml", "a.rbi"]).config_path.as_deref(), Some("opts.toml"));
        assert_eq!(parse(&["-hc", "opts.toml", "a.rbi"]).config_path.as_deref(), Some("opts.toml"));
        assert_eq!(parse(&["--config", "opts.toml"]).config_path.as_deref(), Some("opts.toml"));

        let args = vec!["a.rbi".to_string(), "-c".to_string()];
        assert!(parse_args(&args).is_err());
    }

    #[test]
    fn test_unknown_flags_ignored() {
        let cli = parse(&["-x", "--verbose", "a.rbi", "b.rbi"]);
        assert_eq!(cli, CliArgs { filename: Some("a.rbi".to_string()), ..CliArgs::default() });
    }
}
