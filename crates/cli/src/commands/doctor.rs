use crmpilot_core::config::{AppConfig, LoadOptions};
use secrecy::ExposeSecret;
use serde::Serialize;

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

pub fn run(json_output: bool) -> String {
    let report = build_report();

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
    }

    render_human(&report)
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_crm_credentials(&config));
            checks.push(check_smtp_sender(&config));
            checks.push(check_llm_key(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            for name in ["crm_credentials", "smtp_send_readiness", "llm_key"] {
                checks.push(DoctorCheck {
                    name,
                    status: CheckStatus::Skipped,
                    details: "skipped because configuration did not load".to_string(),
                });
            }
        }
    }

    let failed = checks.iter().any(|check| check.status == CheckStatus::Fail);
    let overall_status = if failed { CheckStatus::Fail } else { CheckStatus::Pass };
    let summary = if failed {
        "doctor: one or more readiness checks failed".to_string()
    } else {
        "doctor: all readiness checks passed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_crm_credentials(config: &AppConfig) -> DoctorCheck {
    // Presence is enforced by config validation; report the endpoint the
    // token will be used against.
    DoctorCheck {
        name: "crm_credentials",
        status: CheckStatus::Pass,
        details: format!("api key present for `{}`", config.crm.base_url),
    }
}

fn check_smtp_sender(config: &AppConfig) -> DoctorCheck {
    if config.notify.sender.trim().is_empty() {
        return DoctorCheck {
            name: "smtp_send_readiness",
            status: CheckStatus::Fail,
            details: "notify.sender is empty; completion emails cannot be sent".to_string(),
        };
    }

    if config.notify.password.expose_secret().trim().is_empty() {
        return DoctorCheck {
            name: "smtp_send_readiness",
            status: CheckStatus::Fail,
            details: "notify.password is empty; SMTP login will be refused".to_string(),
        };
    }

    DoctorCheck {
        name: "smtp_send_readiness",
        status: CheckStatus::Pass,
        details: format!(
            "sender `{}` via {}:{}",
            config.notify.sender, config.notify.smtp_host, config.notify.smtp_port
        ),
    }
}

fn check_llm_key(config: &AppConfig) -> DoctorCheck {
    if config.llm.api_key.is_some() {
        DoctorCheck {
            name: "llm_key",
            status: CheckStatus::Pass,
            details: format!("api key present; model `{}`", config.llm.model),
        }
    } else {
        DoctorCheck {
            name: "llm_key",
            status: CheckStatus::Skipped,
            details: "llm.api_key not set; the assistant runs without an LLM client".to_string(),
        }
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

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
