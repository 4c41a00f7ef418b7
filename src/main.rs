// Small command front end over the library.
//
//   ghcmd rate-limit
//   ghcmd emojis
//   ghcmd markdown <text>
//   ghcmd license <key> | licenses
//   ghcmd gitignore <name> | gitignore-templates
//   ghcmd assignees <owner/repo | url>
//   ghcmd config [<name> [<value>]]

use anyhow::{Context, Result, bail};
use futures::StreamExt;
use std::sync::Arc;

use ghcmd::{ConfigName, ConfigValue, GitHubClient, GitHubContext, MarkdownMode};

#[tokio::main]
async fn main() -> Result<()> {
    let context = Arc::new(GitHubContext::load_default());
    ghcmd::logging::init(&context.config().snapshot())?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first().map(String::as_str) else {
        bail!(
            "usage: ghcmd <rate-limit|emojis|markdown|license|licenses|gitignore|\
             gitignore-templates|assignees|config> [args]"
        );
    };
    if command == "config" {
        return config_command(&context, &args[1..]);
    }

    let gh = GitHubClient::builder()
        .context(Arc::clone(&context))
        .on_progress(|p| {
            eprintln!("page {} of ~{} ({} items)", p.page, p.total_pages, p.items);
        })
        .build()?;

    match command {
        "rate-limit" => {
            let limits = gh.get_rate_limit().await??;
            let core = &limits.resources.core;
            println!(
                "core: {}/{} (resets {})",
                core.remaining,
                core.limit,
                core.reset_at().map(|t| t.to_rfc3339()).unwrap_or_default()
            );
        }
        "emojis" => {
            for (name, url) in gh.list_emojis().await?? {
                println!("{name}\t{url}");
            }
        }
        "markdown" => {
            println!("{}", gh.render_markdown(nth_arg(&args, 1)?, MarkdownMode::Gfm, None).await??);
        }
        "license" => {
            let license = gh.get_license(nth_arg(&args, 1)?).await??;
            println!("{}", license.body.as_deref().unwrap_or_default());
        }
        "licenses" => {
            let mut stream = gh.list_licenses();
            while let Some(license) = stream.next().await {
                let license = license?;
                println!("{}\t{}", license.key, license.name);
            }
        }
        "gitignore" => {
            print!("{}", gh.get_gitignore_template_raw(nth_arg(&args, 1)?).await??);
        }
        "gitignore-templates" => {
            let mut stream = gh.list_gitignore_templates();
            while let Some(name) = stream.next().await {
                println!("{}", name?);
            }
        }
        "assignees" => {
            let target = nth_arg(&args, 1)?;
            let repo = if target.contains("://") {
                gh.repository(Some(target), None, None)?
            } else {
                let (owner, name) = target
                    .split_once('/')
                    .context("expected <owner>/<repo> or a repository URL")?;
                gh.repository(None, Some(owner), Some(name))?
            };
            let mut stream = gh.list_assignees(repo);
            while let Some(user) = stream.next().await {
                println!("{}", user?.login);
            }
        }
        other => bail!("unknown command '{other}'"),
    }

    Ok(())
}

fn nth_arg(args: &[String], i: usize) -> Result<&str> {
    args.get(i)
        .map(String::as_str)
        .with_context(|| format!("'{}' needs an argument", args[0]))
}

fn config_command(context: &GitHubContext, args: &[String]) -> Result<()> {
    match args {
        [] => {
            for name in ConfigName::ALL {
                println!("{name} = {}", context.config().get(name));
            }
        }
        [name] => {
            let name: ConfigName = name.parse()?;
            println!("{}", context.config().get(name));
        }
        [name, value, ..] => {
            let name: ConfigName = name.parse()?;
            let value = match context.config().get(name) {
                ConfigValue::Bool(_) => {
                    ConfigValue::Bool(value.parse().context("expected true or false")?)
                }
                ConfigValue::Number(_) => {
                    ConfigValue::Number(value.parse().context("expected a number")?)
                }
                ConfigValue::Text(_) => ConfigValue::Text(value.clone()),
            };
            context.config().set(name, value, false)?;
        }
    }
    Ok(())
}
