use chrono::Local;
use console::Style;

const LINE_LENGTH: usize = 72;

/// Startup banner, top to bottom. Lines shorter than the banner width are
/// filled out with `#`.
pub fn banner_lines(started_at: &str) -> Vec<String> {
    let rule = "#".repeat(LINE_LENGTH);
    vec![
        rule.clone(),
        pad(format!("## timestack v.{} ", env!("CARGO_PKG_VERSION"))),
        pad("## Time-stack images from movies or animated gifs ".to_string()),
        pad(format!("## Beginning program @ {started_at} ")),
        rule,
    ]
}

fn pad(mut line: String) -> String {
    let len = line.chars().count();
    if len < LINE_LENGTH {
        line.push_str(&"#".repeat(LINE_LENGTH - len));
    }
    line
}

pub fn print_banner() {
    let style = Style::new().cyan().bold();
    let now = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    println!();
    for line in banner_lines(&now) {
        println!("{}", style.apply_to(line));
    }
}
