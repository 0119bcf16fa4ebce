//! Ordered heuristics that fabricate program output from source text.
//!
//! Each rule looks for a trigger in the source and appends zero or more
//! lines. Rules are independent: several may contribute to one run. A rule
//! only counts as fired when it appended at least one line; when none fired
//! the output is exactly [`FALLBACK_OUTPUT`].

use std::sync::LazyLock;

use regex::Regex;

/// Output of a run in which no rule produced anything.
pub const FALLBACK_OUTPUT: &str = "Code executed successfully (no output)";

/// A file produced by a simulated run (e.g., `df.to_csv("out.csv")`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    pub name: String,
    pub content: String,
}

/// Fabricated result of running a block of source text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Simulation {
    /// Output lines in emission order.
    pub lines: Vec<String>,
    /// Files the run wrote.
    pub artifacts: Vec<Artifact>,
    /// Names of the rules that contributed output.
    pub fired: Vec<&'static str>,
}

impl Simulation {
    /// The full output as a single string.
    pub fn output(&self) -> String {
        self.lines.join("\n")
    }

    fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }
}

/// One entry of the rule table.
pub struct Rule {
    pub name: &'static str,
    render: fn(&str, &mut Simulation),
}

/// The rule table, in application order.
pub static RULES: &[Rule] = &[
    Rule {
        name: "imports",
        render: render_imports,
    },
    Rule {
        name: "print",
        render: render_prints,
    },
    Rule {
        name: "correlation",
        render: render_correlation,
    },
    Rule {
        name: "export",
        render: render_exports,
    },
    Rule {
        name: "training",
        render: render_training,
    },
    Rule {
        name: "accelerator",
        render: render_accelerator,
    },
    Rule {
        name: "network",
        render: render_network,
    },
];

/// Run every rule over `source` and collect the fabricated output.
pub fn simulate(source: &str) -> Simulation {
    let mut sim = Simulation::default();
    for rule in RULES {
        let before = sim.lines.len();
        (rule.render)(source, &mut sim);
        if sim.lines.len() > before {
            sim.fired.push(rule.name);
        }
    }
    if sim.fired.is_empty() {
        sim.push(FALLBACK_OUTPUT);
    }
    sim
}

// =============================================================================
// Patterns
// =============================================================================

static IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^[ \t]*(?:import[ \t]+([A-Za-z0-9_.]+)|from[ \t]+([A-Za-z0-9_.]+)[ \t]+import)",
    )
    .expect("import pattern is valid")
});

static PRINT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"print\([ \t]*(f?)(?:"([^"\n]*)"|'([^'\n]*)')"#)
        .expect("print pattern is valid")
});

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}]*)\}").expect("placeholder pattern is valid"));

static EXPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\.(to_csv|to_json|to_excel|savefig)\([ \t]*(?:["']([^"'\n]+)["'])?"#)
        .expect("export pattern is valid")
});

static REQUEST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:requests|httpx)\.(get|post|put|delete)\([ \t]*(?:["']([^"'\n]+)["'])?"#)
        .expect("request pattern is valid")
});

// =============================================================================
// Rules
// =============================================================================

fn render_imports(source: &str, sim: &mut Simulation) {
    let mut seen: Vec<&str> = Vec::new();
    for caps in IMPORT_RE.captures_iter(source) {
        let Some(module) = caps.get(1).or_else(|| caps.get(2)) else {
            continue;
        };
        let module = module.as_str();
        if !seen.contains(&module) {
            seen.push(module);
            sim.push(format!("Imported {}", module));
        }
    }
}

fn render_prints(source: &str, sim: &mut Simulation) {
    for caps in PRINT_RE.captures_iter(source) {
        let is_fstring = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
        let literal = caps
            .get(2)
            .or_else(|| caps.get(3))
            .map(|m| m.as_str())
            .unwrap_or_default();
        let mut line = if is_fstring {
            substitute_placeholders(literal)
        } else {
            literal.to_string()
        };

        let after = caps.get(0).map_or(source.len(), |m| m.end());
        for arg in call_args(&source[after..]) {
            line.push_str(&format!(" <{}>", arg));
        }
        sim.push(line);
    }
}

/// Arguments left in a call after its first one, up to the call's own
/// closing paren. Nested brackets and quoted text are skipped; an unclosed
/// call ends at the line break.
fn call_args(rest: &str) -> Vec<&str> {
    let rest = rest.lines().next().unwrap_or_default();
    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    let mut end = rest.len();

    for (i, c) in rest.char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' if depth > 0 => depth -= 1,
            ')' => {
                end = i;
                break;
            }
            ',' if depth == 0 => {
                args.push(&rest[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    args.push(&rest[start..end]);

    args.into_iter()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .collect()
}

/// Replace `{expr}` and `{expr:spec}` with `<expr>`.
fn substitute_placeholders(template: &str) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &regex::Captures<'_>| {
            let expr = caps[1].split(':').next().unwrap_or_default().trim();
            format!("<{}>", expr)
        })
        .into_owned()
}

fn render_correlation(source: &str, sim: &mut Simulation) {
    if !source.contains(".corr()") {
        return;
    }
    sim.push("           feature_a  feature_b  feature_c");
    sim.push("feature_a   1.000000   0.732541  -0.214387");
    sim.push("feature_b   0.732541   1.000000   0.108263");
    sim.push("feature_c  -0.214387   0.108263   1.000000");
}

fn render_exports(source: &str, sim: &mut Simulation) {
    for caps in EXPORT_RE.captures_iter(source) {
        let method = &caps[1];
        let Some(name) = caps.get(2).map(|m| m.as_str().to_string()) else {
            sim.push("Output written");
            continue;
        };

        let (message, content) = match method {
            "savefig" => (
                format!("Figure saved to '{}'", name),
                "<PNG image data, 640 x 480, 8-bit/color RGBA>".to_string(),
            ),
            "to_json" => (
                format!("Data saved to '{}'", name),
                "[{\"index\":0,\"value\":0.42},{\"index\":1,\"value\":0.87}]\n".to_string(),
            ),
            "to_excel" => (
                format!("Data saved to '{}'", name),
                "<Excel workbook: 1 sheet, 2 rows>".to_string(),
            ),
            _ => (
                format!("Data saved to '{}'", name),
                "index,value\n0,0.42\n1,0.87\n".to_string(),
            ),
        };
        sim.push(message);
        sim.artifacts.push(Artifact { name, content });
    }
}

fn render_training(source: &str, sim: &mut Simulation) {
    if !source.contains(".fit(") {
        return;
    }
    const EPOCHS: [(f64, f64); 5] = [
        (0.6931, 0.5124),
        (0.4827, 0.7419),
        (0.3512, 0.8466),
        (0.2764, 0.8973),
        (0.2139, 0.9347),
    ];
    sim.push("Training model...");
    for (i, (loss, acc)) in EPOCHS.iter().enumerate() {
        sim.push(format!(
            "Epoch {}/{} - loss: {:.4} - accuracy: {:.4}",
            i + 1,
            EPOCHS.len(),
            loss,
            acc
        ));
    }
    sim.push(format!(
        "Training complete. Final accuracy: {:.4}",
        EPOCHS[EPOCHS.len() - 1].1
    ));
}

fn render_accelerator(source: &str, sim: &mut Simulation) {
    let lower = source.to_lowercase();
    if !(lower.contains("cuda") || lower.contains("gpu") || lower.contains("torch.device")) {
        return;
    }
    sim.push("GPU available: True");
    sim.push("Device: NVIDIA Tesla T4 (simulated)");
    sim.push("CUDA version: 12.1");
    sim.push("GPU memory: 0.4 GB allocated / 15.0 GB total");
}

fn render_network(source: &str, sim: &mut Simulation) {
    let mut requests = 0;
    for caps in REQUEST_RE.captures_iter(source) {
        let method = caps[1].to_uppercase();
        let url = caps.get(2).map(|m| m.as_str()).unwrap_or("<url>");
        sim.push(format!("{} {}", method, url));
        requests += 1;
    }
    if requests == 0 && !source.contains("urllib.request") {
        return;
    }
    sim.push("Response status: 200 OK");
    sim.push("Content-Type: application/json");
    sim.push("Response time: 142ms");
}
