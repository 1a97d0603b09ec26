use std::io::{self, Write};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use reqwest::{blocking::Client, StatusCode, Url};

use mergington_shared::{Activities, ActivityRecord, ErrorDetail, MessageResponse};

#[derive(Parser, Debug)]
struct Options {
    /// Address of mergington-server, as `host:port`.
    #[clap(short, long, default_value = "127.0.0.1:8000")]
    server: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Lists all activities with their participants.
    List,
    /// Signs a student up for an activity.
    Signup { activity: String, email: String },
    /// Removes a student from an activity.
    Unregister { activity: String, email: String },
}

/// Builds `http://<server>/activities[/<activity>/<action>]`, percent-encoding the activity name
/// as a single path segment.
fn activities_url(server: &str, target: Option<(&str, &str)>) -> Result<Url> {
    let mut url = Url::parse(&format!("http://{server}/"))
        .with_context(|| format!("invalid server address: {server}"))?;
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| anyhow!("invalid server address: {server}"))?;
        segments.pop_if_empty().push("activities");
        if let Some((activity, action)) = target {
            segments.push(activity).push(action);
        }
    }
    Ok(url)
}

/// Turns a non-2xx response into an error carrying the server's `detail`.
fn check(status: StatusCode, body: String) -> Result<String> {
    if !status.is_success() {
        let detail = serde_json::from_str::<ErrorDetail>(&body)
            .map(|e| e.detail)
            .unwrap_or(body);
        bail!("status ({}): {}", status.as_u16(), detail);
    }
    Ok(body)
}

fn format_activity(name: &str, activity: &ActivityRecord) -> String {
    let mut out = format!(
        "{name} ({}/{} participants, {} spots left)\n  {}\n  {}\n",
        activity.participants.len(),
        activity.max_participants,
        activity.spots_left(),
        activity.description,
        activity.schedule,
    );
    for email in &activity.participants {
        out += &format!("  - {email}\n");
    }
    out
}

fn main() -> Result<()> {
    let args = Options::parse();
    let client = Client::new();
    let mut stdout = io::stdout().lock();

    let (action, activity, email) = match args.command {
        Command::List => {
            let resp = client.get(activities_url(&args.server, None)?).send()?;
            let status = resp.status();
            let activities: Activities = serde_json::from_str(&check(status, resp.text()?)?)?;
            for (name, activity) in &activities {
                writeln!(stdout, "{}", format_activity(name, activity))?;
            }
            return Ok(());
        }
        Command::Signup { activity, email } => ("signup", activity, email),
        Command::Unregister { activity, email } => ("unregister", activity, email),
    };

    let resp = client
        .post(activities_url(&args.server, Some((&activity, action)))?)
        .query(&[("email", &email)])
        .send()?;
    let status = resp.status();
    let body = check(status, resp.text()?)?;
    let response: MessageResponse =
        serde_json::from_str(&body).with_context(|| format!("unexpected response: {body}"))?;
    writeln!(stdout, "{}", response.message)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_signup() {
        let options = Options::try_parse_from([
            "mergington-signup",
            "--server",
            "10.0.0.1:8000",
            "signup",
            "Chess Club",
            "michael@mergington.edu",
        ])
        .unwrap();
        assert_eq!(options.server, "10.0.0.1:8000");
        assert_eq!(
            options.command,
            Command::Signup {
                activity: "Chess Club".to_owned(),
                email: "michael@mergington.edu".to_owned(),
            }
        );
    }

    #[test]
    fn test_parse_requires_email() {
        assert!(Options::try_parse_from(["mergington-signup", "unregister", "Chess Club"]).is_err());
    }

    #[test]
    fn test_activity_name_is_one_segment() {
        for (activity, path) in [
            ("Chess Club", "/activities/Chess%20Club/signup"),
            ("Arts/Crafts", "/activities/Arts%2FCrafts/signup"),
            ("Who's Next?", "/activities/Who's%20Next%3F/signup"),
            ("Band #1", "/activities/Band%20%231/signup"),
        ] {
            let url = activities_url("127.0.0.1:8000", Some((activity, "signup"))).unwrap();
            let request = Client::new()
                .post(url)
                .query(&[("email", "michael@mergington.edu")])
                .build()
                .unwrap();
            assert_eq!(request.url().path(), path, "{activity}");
            assert_eq!(request.url().query(), Some("email=michael%40mergington.edu"));
            assert_eq!(request.url().fragment(), None);
        }
    }

    #[test]
    fn test_list_url() {
        let url = activities_url("10.0.0.1:9000", None).unwrap();
        assert_eq!(url.as_str(), "http://10.0.0.1:9000/activities");
    }

    #[test]
    fn test_check_error_detail() {
        let err = check(
            StatusCode::BAD_REQUEST,
            r#"{"detail":"Student is already signed up for this activity"}"#.to_owned(),
        )
        .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("400"), "{msg}");
        assert!(msg.contains("Student is already signed up for this activity"), "{msg}");
        assert!(!msg.contains("{"), "{msg}");
    }

    #[test]
    fn test_check_plain_text_error() {
        let err = check(StatusCode::BAD_REQUEST, "Bad Request".to_owned()).unwrap_err();
        assert_eq!(err.to_string(), "status (400): Bad Request");
    }

    #[test]
    fn test_check_success() {
        let body = r#"{"message":"Signed up michael@mergington.edu for Chess Club"}"#;
        assert_eq!(check(StatusCode::OK, body.to_owned()).unwrap(), body);
    }

    #[test]
    fn test_format_activity() {
        let activity = ActivityRecord {
            description: "Learn strategies and compete in chess tournaments".to_owned(),
            schedule: "Fridays, 3:30 PM - 5:00 PM".to_owned(),
            max_participants: 12,
            participants: vec!["michael@mergington.edu".to_owned()],
        };
        let out = format_activity("Chess Club", &activity);
        assert!(out.starts_with("Chess Club (1/12 participants, 11 spots left)\n"));
        assert!(out.ends_with("  - michael@mergington.edu\n"));
    }
}
