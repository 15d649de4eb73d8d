use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_AUTH_URL: &str = "http://127.0.0.1:8000/auth/token";
const SERVER_PREFS_FILE: &str = "server_prefs.v1";

/// Where the client talks to: the localization service and the sign-in
/// provider. Environment variables `LOCKIT_API_URL` / `LOCKIT_AUTH_URL`
/// override whatever the prefs file says.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerPrefs {
    pub api_url: String,
    pub auth_url: String,
}

impl Default for ServerPrefs {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
        }
    }
}

pub fn server_prefs_path() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(dir).join("lockit").join(SERVER_PREFS_FILE));
    }
    if let Ok(home) = std::env::var("HOME") {
        return Some(
            PathBuf::from(home)
                .join(".config")
                .join("lockit")
                .join(SERVER_PREFS_FILE),
        );
    }
    #[cfg(target_os = "windows")]
    {
        if let Ok(appdata) = std::env::var("APPDATA") {
            return Some(PathBuf::from(appdata).join("lockit").join(SERVER_PREFS_FILE));
        }
    }
    None
}

pub fn load_server_prefs() -> Result<ServerPrefs, String> {
    let mut prefs = match server_prefs_path() {
        Some(path) if path.exists() => {
            let content = std::fs::read_to_string(&path)
                .map_err(|err| format!("read {}: {err}", path.display()))?;
            parse_server_prefs(&content)?
        }
        _ => ServerPrefs::default(),
    };
    if let Ok(url) = std::env::var("LOCKIT_API_URL") {
        prefs.api_url = url;
    }
    if let Ok(url) = std::env::var("LOCKIT_AUTH_URL") {
        prefs.auth_url = url;
    }
    Ok(prefs)
}

pub fn save_server_prefs(prefs: &ServerPrefs) -> Result<(), String> {
    let Some(path) = server_prefs_path() else {
        return Err("cannot resolve a config directory".to_string());
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|err| format!("create {}: {err}", parent.display()))?;
    }
    std::fs::write(&path, serialize_server_prefs(prefs))
        .map_err(|err| format!("write {}: {err}", path.display()))
}

pub fn serialize_server_prefs(prefs: &ServerPrefs) -> String {
    let mut lines = Vec::new();
    lines.push("version=1".to_string());
    lines.push(format!("api_url={}", escape_pref_value(&prefs.api_url)));
    lines.push(format!("auth_url={}", escape_pref_value(&prefs.auth_url)));
    lines.join("\n")
}

pub fn parse_server_prefs(content: &str) -> Result<ServerPrefs, String> {
    let mut out = ServerPrefs::default();
    let mut version = None::<u32>;
    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            return Err("malformed server prefs line".to_string());
        };
        match key {
            "version" => {
                let v = value
                    .parse::<u32>()
                    .map_err(|_| "malformed server prefs version".to_string())?;
                version = Some(v);
            }
            "api_url" => out.api_url = unescape_pref_value(value)?,
            "auth_url" => out.auth_url = unescape_pref_value(value)?,
            _ => {}
        }
    }
    match version {
        Some(1) => Ok(out),
        Some(v) => Err(format!("unsupported server prefs version: {v}")),
        None => Err("server prefs version missing".to_string()),
    }
}

fn escape_pref_value(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for b in input.bytes() {
        match b {
            b'%' => out.push_str("%25"),
            b'=' => out.push_str("%3D"),
            b'\n' => out.push_str("%0A"),
            b'\r' => out.push_str("%0D"),
            _ => out.push(b as char),
        }
    }
    out
}

fn unescape_pref_value(input: &str) -> Result<String, String> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0usize;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            if i + 2 >= bytes.len() {
                return Err("malformed server prefs escape".to_string());
            }
            let hi = (bytes[i + 1] as char)
                .to_digit(16)
                .ok_or_else(|| "malformed server prefs escape".to_string())?;
            let lo = (bytes[i + 2] as char)
                .to_digit(16)
                .ok_or_else(|| "malformed server prefs escape".to_string())?;
            out.push((hi * 16 + lo) as u8);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).map_err(|_| "malformed server prefs string".to_string())
}
