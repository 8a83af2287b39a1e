use crate::OutputFormat;
use anyhow::Result;
use console::style;
use serde_json::json;
use socialpub_browser::cookies::{CookieScope, SessionCookie, load_cookies};
use std::path::Path;

/// Report which cookies in `file` would be injected for `host`. Values are
/// never printed.
pub fn execute(file: &Path, host: &str, format: OutputFormat) -> Result<()> {
    let cookies = load_cookies(file)?;
    let scope = CookieScope::new(host);

    match format {
        OutputFormat::Json => print_json(&cookies, &scope)?,
        OutputFormat::Pretty => print_pretty(&cookies, &scope),
    }

    Ok(())
}

fn print_json(cookies: &[SessionCookie], scope: &CookieScope) -> Result<()> {
    let entries: Vec<_> = cookies
        .iter()
        .map(|c| {
            json!({
                "name": c.name,
                "domain": c.domain,
                "path": c.path,
                "secure": c.secure,
                "httpOnly": c.http_only,
                "expiry": c.expiry,
                "sameSite": c.same_site,
                "injected": scope.matches(c),
            })
        })
        .collect();

    let report = json!({
        "host": scope.host(),
        "apex": scope.apex(),
        "total": cookies.len(),
        "injected": scope.filter(cookies).len(),
        "cookies": entries,
    });

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn print_pretty(cookies: &[SessionCookie], scope: &CookieScope) {
    println!(
        "\n{}",
        style(format!("Cookies for {} (apex {})", scope.host(), scope.apex())).bold()
    );

    for cookie in cookies {
        let domain = cookie.domain.as_deref().unwrap_or("(no domain)");
        if scope.matches(cookie) {
            println!("  {} {} {}", style("✓").green(), cookie.name, style(domain).dim());
        } else {
            println!(
                "  {} {} {}",
                style("-").dim(),
                style(&cookie.name).dim(),
                style(domain).dim()
            );
        }
    }

    println!(
        "\n{} of {} cookies would be injected",
        scope.filter(cookies).len(),
        cookies.len()
    );
}
