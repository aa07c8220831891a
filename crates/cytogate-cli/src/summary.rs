use console::Style;
use cytogate_core::config::{GateConfig, GateReport};

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * part as f64 / total as f64
    }
}

pub fn print_gate_config(config: &GateConfig, backend_name: &str) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Cytogate"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(8)));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Input"),
        s.path.apply_to(config.input.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(config.output.display())
    );
    match config.format {
        Some(format) => println!(
            "  {:<14}{}",
            s.label.apply_to("Format"),
            s.method.apply_to(format)
        ),
        None => println!(
            "  {:<14}{}",
            s.label.apply_to("Format"),
            s.disabled.apply_to("from extension")
        ),
    }
    println!(
        "  {:<14}{}",
        s.label.apply_to("Backend"),
        s.method.apply_to(backend_name)
    );
    println!();

    println!("  {}", s.header.apply_to("Gates"));
    for (i, gate) in config.gates.iter().enumerate() {
        println!(
            "    {}. {} {}",
            s.label.apply_to(i + 1),
            s.value.apply_to(format!("{} vs {}", gate.x, gate.y)),
            s.label.apply_to(format!(
                "({}/{}, {} vertices)",
                gate.x_scale,
                gate.y_scale,
                gate.polygon.len()
            ))
        );
    }
    println!();
}

pub fn print_gate_report(report: &GateReport) {
    let s = Styles::new();

    println!();
    println!("  {}", s.header.apply_to("Results"));
    for gate in &report.gates {
        println!(
            "    {:<24}{} {}",
            s.label.apply_to(gate.pair.to_string()),
            s.value.apply_to(gate.inside),
            s.label.apply_to(format!("({:.1}%)", percent(gate.inside, report.total)))
        );
    }
    println!(
        "    {:<24}{} of {} {}",
        s.label.apply_to("All gates"),
        s.value.apply_to(report.passing),
        report.total,
        s.label.apply_to(format!("({:.1}%)", percent(report.passing, report.total)))
    );
    println!();
    println!(
        "  {:<14}{} {}",
        s.label.apply_to("Saved"),
        s.path.apply_to(report.output.display()),
        s.method.apply_to(format!("[{}]", report.format))
    );
    if let Some(ref metadata) = report.metadata {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Metadata"),
            s.path.apply_to(metadata.display())
        );
    }
    println!();
}
