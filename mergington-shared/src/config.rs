use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddrV4};

use crate::{Activities, ActivityRecord};

/// Port the server listens on when `http.listen_on` is not configured.
pub const DEFAULT_PORT: u16 = 8000;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HttpConfig {
    pub listen_on: SocketAddrV4,
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig {
            listen_on: SocketAddrV4::new(Ipv4Addr::LOCALHOST, DEFAULT_PORT),
        }
    }
}

/// Contents of `config.yaml`.
///
/// Every section is optional; a missing `activities` section seeds the registry with
/// [`default_activities`].
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub activities: Activities,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            http: HttpConfig::default(),
            activities: default_activities(),
        }
    }
}

/// The activities offered at the start of the school year.
pub fn default_activities() -> Activities {
    let seed = [
        (
            "Basketball Team",
            "Join the school basketball team and compete in league games",
            "Mondays and Wednesdays, 4:00 PM - 6:00 PM",
            15,
            ["john@mergington.edu", "michael@mergington.edu"],
        ),
        (
            "Swimming Club",
            "Improve your swimming techniques and participate in swim meets",
            "Tuesdays and Thursdays, 3:30 PM - 5:00 PM",
            20,
            ["olivia@mergington.edu", "emma@mergington.edu"],
        ),
        (
            "Drama Club",
            "Participate in theater productions and develop acting skills",
            "Wednesdays, 3:30 PM - 5:30 PM",
            25,
            ["sophia@mergington.edu", "emily@mergington.edu"],
        ),
        (
            "Art Studio",
            "Express creativity through painting, drawing, and sculpture",
            "Fridays, 3:00 PM - 5:00 PM",
            18,
            ["daniel@mergington.edu", "ava@mergington.edu"],
        ),
        (
            "Debate Team",
            "Develop critical thinking and public speaking through competitive debates",
            "Tuesdays, 4:00 PM - 5:30 PM",
            16,
            ["michael@mergington.edu", "sophia@mergington.edu"],
        ),
        (
            "Science Olympiad",
            "Compete in science competitions and conduct experiments",
            "Thursdays, 3:30 PM - 5:00 PM",
            20,
            ["emma@mergington.edu", "john@mergington.edu"],
        ),
    ];

    seed.into_iter()
        .map(|(name, description, schedule, max_participants, participants)| {
            let record = ActivityRecord {
                description: description.to_owned(),
                schedule: schedule.to_owned(),
                max_participants,
                participants: Vec::from(participants.map(str::to_owned)),
            };
            (name.to_owned(), record)
        })
        .collect()
}
