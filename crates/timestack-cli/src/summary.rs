use console::Style;
use timestack_core::consts::DEFAULT_DPI;
use timestack_core::pipeline::PipelineConfig;

struct Styles {
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

fn bound(value: Option<i64>, edge: &str) -> String {
    value.map_or_else(|| edge.to_string(), |v| v.to_string())
}

pub fn print_run_summary(config: &PipelineConfig) {
    let s = Styles::new();

    println!();
    println!(
        "  {:<12}{}",
        s.label.apply_to("Input"),
        s.path.apply_to(config.input.display())
    );
    println!(
        "  {:<12}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(config.output.display())
    );
    println!(
        "  {:<12}{}",
        s.label.apply_to("Method"),
        s.method.apply_to(config.method)
    );
    println!(
        "  {:<12}{}",
        s.label.apply_to("Interval"),
        s.value.apply_to(config.interval)
    );
    if config.grayscale {
        println!("  {:<12}{}", s.label.apply_to("Grayscale"), s.value.apply_to("yes"));
    } else {
        println!("  {:<12}{}", s.label.apply_to("Grayscale"), s.disabled.apply_to("no"));
    }

    if config.roi.is_unset() {
        println!("  {:<12}{}", s.label.apply_to("Region"), s.disabled.apply_to("full frame"));
    } else {
        let roi = &config.roi;
        println!(
            "  {:<12}{}",
            s.label.apply_to("Region"),
            s.value.apply_to(format!(
                "x {}..{}, y {}..{}",
                bound(roi.x_min, "0"),
                bound(roi.x_max, "width"),
                bound(roi.y_min, "0"),
                bound(roi.y_max, "height")
            ))
        );
    }
    if config.frame_range.is_unset() {
        println!("  {:<12}{}", s.label.apply_to("Frames"), s.disabled.apply_to("all"));
    } else {
        println!(
            "  {:<12}{}",
            s.label.apply_to("Frames"),
            s.value.apply_to(format!(
                "{}..{}",
                bound(config.frame_range.first, "0"),
                bound(config.frame_range.last, "end")
            ))
        );
    }

    println!(
        "  {:<12}{}",
        s.label.apply_to("DPI"),
        s.value.apply_to(config.dpi.unwrap_or(DEFAULT_DPI))
    );
    println!();
}
