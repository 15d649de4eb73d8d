use std::io::{self, BufRead, Write};

use lk_core::model::Category;
use lk_core::table::PAGE_SIZE;

use lk_app::actions::AppAction;
use lk_app::driver::AppDriver;
use lk_app::http::HttpBackend;
use lk_app::prefs::{load_server_prefs, save_server_prefs, ServerPrefs};

fn main() {
    env_logger::init();

    let prefs = match load_server_prefs() {
        Ok(prefs) => prefs,
        Err(err) => {
            eprintln!("lockit: {err}");
            std::process::exit(1);
        }
    };
    println!("lockit - {} (type 'help')", prefs.api_url);

    let backend = HttpBackend::new(prefs.api_url, prefs.auth_url);
    let mut driver = AppDriver::new(backend);

    let stdin = io::stdin();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(err) => {
                eprintln!("lockit: {err}");
                break;
            }
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" || line == "exit" {
            break;
        }
        match run_command(&mut driver, line) {
            Ok(true) => print_table(&driver),
            Ok(false) => {}
            Err(err) => eprintln!("error: {err}"),
        }
    }
}

/// Returns whether the command should be followed by a table render.
fn run_command(driver: &mut AppDriver<HttpBackend>, line: &str) -> Result<bool, String> {
    let (command, rest) = match line.split_once(' ') {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };
    match command {
        "help" => {
            print_help();
            Ok(false)
        }
        "login" => {
            let (email, password) = rest
                .split_once(' ')
                .ok_or_else(|| "usage: login <email> <password>".to_string())?;
            driver.dispatch(AppAction::SignIn {
                email: email.to_string(),
                password: password.to_string(),
            })?;
            Ok(true)
        }
        "logout" => driver.dispatch(AppAction::SignOut).map(|_| false),
        "status" => {
            print_status(driver);
            Ok(false)
        }
        "projects" => {
            for project in driver.state().catalog.available_projects() {
                println!("{}  {}", project.id, project.name);
            }
            Ok(false)
        }
        "languages" => {
            for language in driver.state().catalog.available_languages() {
                println!("{}  {}", language.id, language.name);
            }
            Ok(false)
        }
        "project" => driver
            .dispatch(AppAction::SelectProject(rest.to_string()))
            .map(|_| true),
        "lang" => driver
            .dispatch(AppAction::SelectLanguage(rest.to_string()))
            .map(|_| true),
        "search" => driver
            .dispatch(AppAction::SetSearch(rest.to_string()))
            .map(|_| true),
        "tag" => {
            let tag = Category::parse(rest).ok_or_else(|| format!("unknown category: {rest}"))?;
            driver.dispatch(AppAction::ToggleTag(tag)).map(|_| true)
        }
        "page" => {
            let page = rest.parse::<usize>().map_err(|_| "usage: page <n>".to_string())?;
            driver.dispatch(AppAction::SetPage(page)).map(|_| true)
        }
        "next" => driver.dispatch(AppAction::NextPage).map(|_| true),
        "prev" => driver.dispatch(AppAction::PrevPage).map(|_| true),
        "list" => Ok(true),
        "edit" => {
            let (row_id, value) = rest
                .split_once(' ')
                .ok_or_else(|| "usage: edit <row-id> <value>".to_string())?;
            driver.dispatch(AppAction::BeginEdit(row_id.to_string()))?;
            driver.dispatch(AppAction::SetEditValue(value.to_string()))?;
            driver.dispatch(AppAction::SaveEdit).map(|_| true)
        }
        "add" => {
            // add <key> <category> <value...>
            let mut parts = rest.splitn(3, ' ');
            let key = parts.next().unwrap_or("");
            let category = parts.next().unwrap_or("");
            let value = parts.next().unwrap_or("");
            let category = Category::parse(category)
                .ok_or_else(|| format!("unknown category: {category}"))?;
            driver.dispatch(AppAction::OpenAddForm)?;
            driver.dispatch(AppAction::SetAddKey(key.to_string()))?;
            driver.dispatch(AppAction::SetAddCategory(category))?;
            driver.dispatch(AppAction::SetAddValue(value.to_string()))?;
            driver.dispatch(AppAction::SubmitAddForm).map(|_| true)
        }
        "delete" => driver
            .dispatch(AppAction::DeleteKey(rest.to_string()))
            .map(|_| true),
        "import" => {
            let (language, path) = rest
                .split_once(' ')
                .ok_or_else(|| "usage: import <language> <file.csv>".to_string())?;
            let bytes = std::fs::read(path).map_err(|err| format!("read {path}: {err}"))?;
            let filename = std::path::Path::new(path)
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or("import.csv")
                .to_string();
            driver.dispatch(AppAction::OpenImport)?;
            driver.dispatch(AppAction::SetImportLanguage(language.to_string()))?;
            driver.dispatch(AppAction::StageImportFile { filename, bytes })?;
            driver.dispatch(AppAction::SubmitImport).map(|_| true)
        }
        "refresh" => driver.dispatch(AppAction::Refresh).map(|_| true),
        "server" => {
            let (api_url, auth_url) = rest
                .split_once(' ')
                .ok_or_else(|| "usage: server <api-url> <auth-url>".to_string())?;
            save_server_prefs(&ServerPrefs {
                api_url: api_url.to_string(),
                auth_url: auth_url.to_string(),
            })?;
            println!("server prefs saved; restart to apply");
            Ok(false)
        }
        _ => Err(format!("unknown command: {command} (type 'help')")),
    }
}

fn print_help() {
    println!(
        "commands:\n  \
         login <email> <password> | logout | status\n  \
         projects | languages | project <id> | lang <id>\n  \
         list | search <term> | tag <category> | page <n> | next | prev\n  \
         edit <row-id> <value> | add <key> <category> <value> | delete <key>\n  \
         import <language> <file.csv> | refresh\n  \
         server <api-url> <auth-url> | quit"
    );
}

fn print_status(driver: &AppDriver<HttpBackend>) {
    let snapshot = driver.snapshot();
    if snapshot.authenticated {
        println!(
            "signed in as {}",
            snapshot.user_identity.as_deref().unwrap_or("(profile pending)")
        );
    } else {
        println!("signed out");
    }
    println!(
        "project={} language={} keys={} filtered={}",
        snapshot.selected_project.as_deref().unwrap_or("-"),
        snapshot.selected_language.as_deref().unwrap_or("-"),
        snapshot.total_keys,
        snapshot.filtered_keys,
    );
    if let Some(err) = &snapshot.last_error {
        println!("last error: {err}");
    }
}

fn print_table(driver: &AppDriver<HttpBackend>) {
    let state = driver.state();
    if !state.session.is_authenticated() {
        println!("(signed out - use 'login')");
        return;
    }
    let Some(language) = state.active_language().map(str::to_string) else {
        println!("(no language selected)");
        return;
    };

    let snapshot = driver.snapshot();
    for row in state.visible_rows() {
        println!(
            "{:<10} {:<28} {:<10} {}",
            row.id,
            row.key,
            row.category,
            row.value_for(&language).unwrap_or("-"),
        );
    }
    println!(
        "page {}/{} ({} rows, {} per page)",
        snapshot.page,
        snapshot.page_count.max(1),
        snapshot.filtered_keys,
        PAGE_SIZE,
    );
}
