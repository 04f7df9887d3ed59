use std::error::Error;
use std::path::Path;

use anyhow::{anyhow, Result};
use console::style;
use fern::colors::{Color, ColoredLevelConfig};
use log::{Level, LevelFilter};
use tabwriter::TabWriter;

pub fn set_hook() {
    // setup a panic hook to easily exit the program on panic
    std::panic::set_hook(Box::new(|panic_info| {
        // print the panic message
        let message = if let Some(message) = panic_info.payload().downcast_ref::<String>() {
            message.clone()
        } else if let Some(message) = panic_info.payload().downcast_ref::<&str>() {
            (*message).to_string()
        } else {
            format!("{panic_info:?}")
        };

        // add some color
        log::error!("{message}");

        #[cfg(debug_assertions)]
        log::debug!("{panic_info}");

        std::process::exit(1);
    }));
}

pub fn logs(verbose: bool) {
    let colors = ColoredLevelConfig::new()
        .info(Color::BrightCyan)
        .error(Color::BrightRed)
        .warn(Color::BrightYellow)
        .debug(Color::BrightWhite);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            let level = record.level();

            match level {
                Level::Debug => out.finish(format_args!(
                    "{} [{}]: {}",
                    colors.color(Level::Debug).to_string().to_lowercase(),
                    record.target(),
                    message
                )),

                level => out.finish(format_args!(
                    "{}: {}",
                    colors.color(level).to_string().to_lowercase(),
                    message
                )),
            }
        })
        .level(if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        // keep the http stack quiet unless something is wrong
        .level_for("hyper", LevelFilter::Warn)
        .level_for("reqwest", LevelFilter::Warn)
        .chain(
            fern::Dispatch::new()
                .filter(|metadata| !matches!(metadata.level(), Level::Error | Level::Warn))
                .chain(std::io::stdout()),
        )
        .chain(
            fern::Dispatch::new()
                .level(log::LevelFilter::Warn)
                .chain(std::io::stderr()),
        )
        .apply()
        .ok();
}

/// Makes a command or path stand out in the output.
pub fn highlight(s: &str) -> String {
    style(s).bold().underlined().to_string()
}

/// Splits a finished table into its lines.
pub fn into_lines(tw: TabWriter<Vec<u8>>) -> Result<Vec<String>> {
    let bytes = tw
        .into_inner()
        .map_err(|_| anyhow!("Error while formatting table"))?;

    Ok(String::from_utf8(bytes)?
        .lines()
        .map(std::string::ToString::to_string)
        .collect())
}

pub fn parse_key_val<T, U>(s: &str) -> core::result::Result<(T, U), Box<dyn Error + Send + Sync>>
where
    T: std::str::FromStr,
    T::Err: Error + Send + Sync + 'static,
    U: std::str::FromStr,
    U::Err: Error + Send + Sync + 'static,
{
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid KEY=value: no `=` found in `{s}`"))?;

    Ok((s[..pos].parse::<T>()?, s[pos + 1..].parse::<U>()?))
}

/// Content type sent along with uploaded documents.
pub fn mime_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_lowercase);

    match extension.as_deref() {
        Some("pdf") => "application/pdf",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        Some("pptx") => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        Some("csv") => "text/csv",
        Some("txt") | Some("md") => "text/plain",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_key_val() {
        let (key, value) = parse_key_val::<String, String>("budget=Low").unwrap();
        assert_eq!(key, "budget");
        assert_eq!(value, "Low");

        let (key, value) = parse_key_val::<String, String>("query=a=b").unwrap();
        assert_eq!(key, "query");
        assert_eq!(value, "a=b");

        assert!(parse_key_val::<String, String>("budget").is_err());
    }

    #[test]
    fn test_mime_type() {
        assert_eq!(mime_type(Path::new("deck.PDF")), "application/pdf");
        assert_eq!(mime_type(Path::new("logo.jpeg")), "image/jpeg");
        assert_eq!(mime_type(Path::new("notes")), "application/octet-stream");
    }
}
