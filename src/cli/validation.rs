//! Value parsers for CLI arguments
//!
//! Each function is plugged into clap with `value_parser = ...` so bad input
//! is rejected with a specific message before any command runs.

use std::net::Ipv4Addr;
use std::path::PathBuf;

use jiff::civil::Date;

/// Port number between 1 and 65535
pub fn validate_port(port_str: &str) -> Result<u16, String> {
    let port: u16 = port_str.parse().map_err(|_| {
        format!(
            "Port must be a valid number between 1 and 65535, got: '{}'",
            port_str
        )
    })?;

    if port == 0 {
        return Err("Port must be between 1 and 65535. Port 0 is not allowed.".to_string());
    }

    Ok(port)
}

/// Configuration file that exists and can be opened
pub fn validate_config_file_path(path_str: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(format!("Configuration file does not exist: '{}'", path_str));
    }

    if !path.is_file() {
        return Err(format!("Configuration path is not a file: '{}'", path_str));
    }

    std::fs::File::open(&path)
        .map(|_| path)
        .map_err(|e| format!("Cannot read configuration file '{}': {}", path_str, e))
}

/// Rollback steps between 1 and 100
pub fn validate_rollback_steps(steps_str: &str) -> Result<u32, String> {
    let steps: u32 = steps_str.parse().map_err(|_| {
        format!(
            "Rollback steps must be a valid positive number, got: '{}'",
            steps_str
        )
    })?;

    match steps {
        0 => Err("Rollback steps must be greater than 0".to_string()),
        101.. => Err("Rollback steps cannot exceed 100 for safety reasons".to_string()),
        _ => Ok(steps),
    }
}

/// Hostname, `localhost` or dotted IPv4 address
pub fn validate_host_address(host_str: &str) -> Result<String, String> {
    let host = host_str.trim();

    if host.is_empty() {
        return Err("Host address cannot be empty".to_string());
    }

    if host.contains(char::is_whitespace) {
        return Err("Host address cannot contain spaces".to_string());
    }

    if host.len() > 253 {
        return Err("Host address is too long (maximum 253 characters)".to_string());
    }

    // All digits and dots means it has to be a real IPv4 address.
    if host.chars().all(|c| c.is_ascii_digit() || c == '.') && host.parse::<Ipv4Addr>().is_err() {
        return Err(format!("Invalid IPv4 address format: '{}'", host_str));
    }

    Ok(host.to_string())
}

/// Student id as assigned by the store
pub fn validate_student_id(id_str: &str) -> Result<i32, String> {
    match id_str.trim().parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(format!("Student id must be a positive number, got: '{}'", id_str)),
    }
}

/// Calendar date in `YYYY-MM-DD` form
pub fn validate_date(date_str: &str) -> Result<Date, String> {
    date_str
        .trim()
        .parse::<Date>()
        .map_err(|e| format!("Expected a date like 2015-03-21, got '{}': {}", date_str, e))
}

/// API base URL for the `students` commands
pub fn validate_api_url(url_str: &str) -> Result<String, String> {
    let url = url_str.trim().trim_end_matches('/');
    if !(url.starts_with("http://") || url.starts_with("https://")) || url.contains(' ') {
        return Err(format!(
            "API URL must look like http://host[:port], got: '{}'",
            url_str
        ));
    }
    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_validation() {
        for port in ["1", "80", "5000", "65535"] {
            assert!(validate_port(port).is_ok(), "Port {} should be valid", port);
        }
        for port in ["0", "65536", "abc", "-1", ""] {
            assert!(validate_port(port).is_err(), "Port {} should be invalid", port);
        }
    }

    #[test]
    fn test_config_file_validation() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap();
        assert_eq!(validate_config_file_path(path).unwrap(), file.path());

        let dir = tempfile::TempDir::new().unwrap();
        let err = validate_config_file_path(dir.path().to_str().unwrap()).unwrap_err();
        assert!(err.contains("not a file"));
        assert!(validate_config_file_path("/no/such/school.toml").is_err());
    }

    #[test]
    fn test_host_validation() {
        for host in ["localhost", "127.0.0.1", "0.0.0.0", "10.0.0.1", "school.local"] {
            assert!(validate_host_address(host).is_ok(), "Host {} should be valid", host);
        }
        let long = "x".repeat(300);
        for host in ["", "   ", "host with spaces", "999.999.999.999", long.as_str()] {
            assert!(validate_host_address(host).is_err(), "Host '{}' should be invalid", host);
        }
    }

    #[test]
    fn test_rollback_steps_validation() {
        for steps in ["1", "50", "100"] {
            assert!(validate_rollback_steps(steps).is_ok(), "Steps {} should be valid", steps);
        }
        for steps in ["0", "101", "-1", "abc"] {
            assert!(validate_rollback_steps(steps).is_err(), "Steps '{}' should be invalid", steps);
        }
    }

    #[test]
    fn test_student_id_validation() {
        assert_eq!(validate_student_id("12").unwrap(), 12);
        for id in ["0", "-3", "abc", ""] {
            assert!(validate_student_id(id).is_err(), "id '{}' should be invalid", id);
        }
    }

    #[test]
    fn test_date_validation() {
        assert_eq!(
            validate_date("2015-03-21").unwrap(),
            jiff::civil::date(2015, 3, 21)
        );
        assert!(validate_date("21/03/2015").is_err());
        assert!(validate_date("2015-02-30").is_err());
    }

    #[test]
    fn test_api_url_validation() {
        assert_eq!(
            validate_api_url("http://127.0.0.1:5000/").unwrap(),
            "http://127.0.0.1:5000"
        );
        assert!(validate_api_url("127.0.0.1:5000").is_err());
    }
}
