use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use ime_switch_catalog::{Catalog, Config};
use ime_switch_core::{
    controller::SwitchingController, locale::SystemLocale, model::Item, ring::Direction,
    source::VariantSource, usage::HistoryPolicy,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum HistoryArg {
    /// 只提升最近一次使用的条目
    Single,
    /// 保留完整的最近使用序列
    Stack,
}

impl From<HistoryArg> for HistoryPolicy {
    fn from(arg: HistoryArg) -> Self {
        match arg {
            HistoryArg::Single => HistoryPolicy::SinglePromotion,
            HistoryArg::Stack => HistoryPolicy::RecencyStack,
        }
    }
}

/// 交互式演示：在输入法目录上做 next/prev 切换。
#[derive(Debug, Parser)]
#[command(name = "ime_switch_cli", version)]
struct Args {
    /// 输入法目录（TOML）；默认取配置中的路径
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// 配置文件路径
    #[arg(long)]
    config: Option<PathBuf>,
    /// 覆盖系统 locale（例如 en_US）
    #[arg(long)]
    locale: Option<String>,
    /// 使用记录策略
    #[arg(long, value_enum)]
    history: Option<HistoryArg>,
}

/// REPL 状态：目录 + controller + 当前条目。
struct Shell {
    catalog: Catalog,
    system: SystemLocale,
    controller: SwitchingController,
    current: Option<Item>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let config_path = args.config.clone().unwrap_or_else(Config::config_path);
    let config = Config::load_from(&config_path)
        .with_context(|| format!("loading config {}", config_path.display()))?;
    info!(path = %config_path.display(), "config loaded");

    let catalog_path = args.catalog.clone().unwrap_or_else(|| config.catalog.path.clone());
    let catalog = Catalog::from_path(&catalog_path)
        .with_context(|| format!("loading catalog {}", catalog_path.display()))?;

    let system = match &args.locale {
        Some(tag) => SystemLocale::new(tag.as_str()),
        None => config.system_locale(),
    };
    let policy = args.history.map(HistoryPolicy::from).unwrap_or(config.rotation.history);

    let controller = SwitchingController::new(catalog.enabled_items(&system), policy);
    let current = controller.sorted_candidates().into_iter().next();
    let mut shell = Shell {
        catalog,
        system,
        controller,
        current,
    };

    let stdin = io::stdin();
    let mut out = io::stdout();
    writeln!(
        out,
        "ime-switch demo | catalog: {} | locale: {} | history: {policy:?}",
        catalog_path.display(),
        shell.system.tag()
    )?;
    writeln!(out, "输入 help 查看命令，:q 退出。")?;
    repl(&mut shell, stdin.lock(), &mut out)
}

fn print_help(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "list               列出全部条目（* 为当前）")?;
    writeln!(out, "n / p              下一个 / 上一个")?;
    writeln!(out, "N / P              只在当前输入法内切换")?;
    writeln!(out, "go <i>             切到 list 中第 i 项（算一次用户动作）")?;
    writeln!(out, "use                对当前条目记一次用户动作")?;
    writeln!(out, "enable <name>      启用输入法并重建")?;
    writeln!(out, "disable <name>     禁用输入法并重建")?;
    writeln!(out, "dump / json        输出当前切换顺序")?;
    writeln!(out, ":q                 退出")
}

fn repl(shell: &mut Shell, input: impl BufRead, out: &mut impl Write) -> Result<()> {
    let mut lines = input.lines();
    loop {
        print_current(shell, out)?;
        write!(out, "switch> ")?;
        out.flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let mut words = line.split_whitespace();
        let Some(cmd) = words.next() else {
            continue;
        };
        let arg = words.next();

        match cmd {
            ":q" | ":quit" | ":exit" => break,
            "help" | "h" => print_help(out)?,
            "list" | "ls" => list(shell, out)?,
            "n" => navigate(shell, out, false, Direction::Forward)?,
            "p" => navigate(shell, out, false, Direction::Backward)?,
            "N" => navigate(shell, out, true, Direction::Forward)?,
            "P" => navigate(shell, out, true, Direction::Backward)?,
            "use" => {
                if let Some(cur) = &shell.current {
                    shell.controller.record_user_action(cur);
                }
            }
            "go" => {
                let sorted = shell.controller.sorted_candidates();
                match arg.and_then(|s| s.parse::<usize>().ok()).and_then(|i| sorted.get(i)) {
                    Some(item) => {
                        shell.controller.record_user_action(item);
                        shell.current = Some(item.clone());
                    }
                    None => writeln!(out, "无效下标，请先用 list 查看")?,
                }
            }
            "enable" | "disable" => {
                let Some(name) = arg else {
                    writeln!(out, "用法：{cmd} <name>")?;
                    continue;
                };
                match shell.catalog.set_enabled(name, cmd == "enable") {
                    Ok(true) => rebuild(shell),
                    Ok(false) => writeln!(out, "(无变化)")?,
                    Err(e) => writeln!(out, "{e}")?,
                }
            }
            "dump" => {
                for line in shell.controller.dump_lines() {
                    writeln!(out, "{line}")?;
                }
            }
            "json" => {
                let json = serde_json::to_string_pretty(&shell.controller.snapshot())?;
                writeln!(out, "{json}")?;
            }
            _ => writeln!(out, "未知命令：{cmd}（help 查看命令）")?,
        }
    }
    Ok(())
}

fn print_current(shell: &Shell, out: &mut impl Write) -> io::Result<()> {
    match &shell.current {
        Some(cur) => writeln!(out, "> {cur}"),
        None => writeln!(out, "> (没有可用的输入法)"),
    }
}

fn list(shell: &Shell, out: &mut impl Write) -> io::Result<()> {
    for (i, it) in shell.controller.sorted_candidates().iter().enumerate() {
        let mark = if shell.current.as_ref() == Some(it) { '*' } else { ' ' };
        let ring = if it.supports_rotation() { "aware" } else { "unaware" };
        writeln!(out, "{mark}{i}. {it}\t[{ring}]")?;
    }
    Ok(())
}

fn navigate(
    shell: &mut Shell,
    out: &mut impl Write,
    only_current_provider: bool,
    direction: Direction,
) -> io::Result<()> {
    let Some(cur) = &shell.current else {
        return Ok(());
    };
    match shell.controller.get_next(only_current_provider, cur, direction) {
        Some(next) => shell.current = Some(next.clone()),
        None => writeln!(out, "(没有可切换的目标)")?,
    }
    Ok(())
}

/// 目录变化后重建 controller；当前条目失效时回到排序后的第一项。
fn rebuild(shell: &mut Shell) {
    let next = SwitchingController::rebuild_from_source(
        Some(&shell.controller),
        &shell.catalog,
        &shell.system,
    );
    shell.controller = next;
    let still_present = shell
        .current
        .as_ref()
        .is_some_and(|cur| shell.controller.candidates().contains(cur));
    if !still_present {
        shell.current = shell.controller.sorted_candidates().into_iter().next();
        debug!(current = ?shell.current, "current item reset after rebuild");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = include_str!("../asset/catalog.toml");

    fn shell() -> Shell {
        let catalog = Catalog::from_toml_str(CATALOG).unwrap();
        let system = SystemLocale::new("en_US");
        let controller =
            SwitchingController::new(catalog.enabled_items(&system), HistoryPolicy::default());
        let current = controller.sorted_candidates().into_iter().next();
        Shell {
            catalog,
            system,
            controller,
            current,
        }
    }

    fn run(shell: &mut Shell, script: &str) -> String {
        let mut out = Vec::new();
        repl(shell, script.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_navigation_commands() {
        let mut shell = shell();
        assert_eq!(shell.current.as_ref().unwrap().provider_name(), "JapaneseIme");

        run(&mut shell, "n\nn\n");
        let cur = shell.current.clone().unwrap();
        assert_eq!((cur.provider_name(), cur.locale_tag()), ("LatinIme", "fr"));

        run(&mut shell, "P\n");
        assert_eq!(shell.current.as_ref().unwrap().locale_tag(), "en_US");

        let output = run(&mut shell, "N\nN\nN\n");
        assert!(!output.contains("没有可切换的目标"));
    }

    #[test]
    fn test_go_records_user_action() {
        let mut shell = shell();
        run(&mut shell, "go 2\n");
        let fr = shell.current.clone().unwrap();
        assert_eq!(fr.locale_tag(), "fr");
        assert_eq!(shell.controller.aware_order()[0], &fr);

        let output = run(&mut shell, "go 99\n");
        assert!(output.contains("无效下标"));
    }

    #[test]
    fn test_disable_resets_current_item() {
        let mut shell = shell();
        let output = run(&mut shell, "disable JapaneseIme\ndisable JapaneseIme\ndisable Nope\n");
        assert!(output.contains("(无变化)"));
        assert!(output.contains("unknown provider"));
        assert_eq!(shell.current.as_ref().unwrap().provider_name(), "LatinIme");
        assert!(shell.controller.find("JapaneseIme", Some(0)).is_none());

        run(&mut shell, "enable JapaneseIme\n");
        assert!(shell.controller.find("JapaneseIme", Some(0)).is_some());
    }

    #[test]
    fn test_single_variant_provider_has_no_same_provider_target() {
        let mut shell = shell();
        let output = run(&mut shell, "N\n");
        assert!(output.contains("没有可切换的目标"));
    }

    #[test]
    fn test_dump_and_json() {
        let mut shell = shell();
        let output = run(&mut shell, "dump\njson\nbogus\n:q\nn\n");
        assert!(output.contains("switching-aware rotation:"));
        assert!(output.contains("\"usage\""));
        assert!(output.contains("未知命令：bogus"));
        // :q 之后的命令不再执行
        assert_eq!(shell.current.as_ref().unwrap().provider_name(), "JapaneseIme");
    }
}
