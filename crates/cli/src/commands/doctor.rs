use contech_core::config::{AppConfig, LoadOptions};
use serde::Serialize;

use crate::commands::CommandResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> CommandResult {
    let report = build_report();
    let exit_code = if report.overall_status == CheckStatus::Pass { 0 } else { 1 };

    if json_output {
        let mut result = CommandResult::json("doctor", &report);
        if result.exit_code == 0 {
            result.exit_code = exit_code;
        }
        return result;
    }

    CommandResult { exit_code, output: render_human(&report) }
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions { defer_credentials: true, ..LoadOptions::default() }) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_pricing_tables(&config));
            checks.push(check_llm_credentials(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            for name in ["pricing_tables", "llm_credentials"] {
                checks.push(DoctorCheck {
                    name,
                    status: CheckStatus::Skipped,
                    details: "skipped because configuration did not load".to_string(),
                });
            }
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_pricing_tables(config: &AppConfig) -> DoctorCheck {
    let source = config
        .estimating
        .pricing_path
        .as_ref()
        .map_or_else(|| "builtin tables".to_string(), |path| format!("`{}`", path.display()));

    match config.estimating.pricing_tables() {
        Ok(tables) => DoctorCheck {
            name: "pricing_tables",
            status: CheckStatus::Pass,
            details: format!(
                "loaded {} material prices, {} labor rates, {} equipment rates from {source}",
                tables.material_price_count(),
                tables.labor_types().len(),
                tables.equipment_types().len()
            ),
        },
        Err(error) => DoctorCheck {
            name: "pricing_tables",
            status: CheckStatus::Fail,
            details: format!("failed to load pricing from {source}: {error}"),
        },
    }
}

fn check_llm_credentials(config: &AppConfig) -> DoctorCheck {
    let details = match (config.llm.provider.requires_api_key(), config.llm.has_api_key()) {
        (true, true) => "api key present for provider".to_string(),
        (false, _) => "provider does not require an api key".to_string(),
        (true, false) => {
            return DoctorCheck {
                name: "llm_credentials",
                status: CheckStatus::Fail,
                details: "api key missing for provider. \
                          Set CONTECH_LLM_API_KEY or OPENAI_API_KEY"
                    .to_string(),
            };
        }
    };

    DoctorCheck {
        name: "llm_credentials",
        status: CheckStatus::Pass,
        details: format!("{details}; requests go to {}", config.llm.endpoint_base()),
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}
