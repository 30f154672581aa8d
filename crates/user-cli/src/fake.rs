//! Random user records for seeding

use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use user_core::NewUser;

const FIRST_NAMES: &[&str] = &[
    "Alice", "Bruno", "Chloe", "Daniel", "Elena", "Farid", "Grace", "Hugo", "Ines", "Jonas",
    "Keiko", "Liam", "Maya", "Nadia", "Omar", "Priya", "Quentin", "Rosa", "Sven", "Tara",
    "Umar", "Vera", "Wei", "Ximena", "Yusuf", "Zoe",
];

const LAST_NAMES: &[&str] = &[
    "Anderson", "Baker", "Castro", "Dubois", "Eriksen", "Fischer", "Garcia", "Haddad", "Ito",
    "Jensen", "Kowalski", "Lopez", "Muller", "Nguyen", "Okafor", "Petrov", "Quinn", "Rossi",
    "Silva", "Tanaka", "Urban", "Vargas", "Weber", "Yilmaz", "Zhang",
];

const DOMAINS: &[&str] = &["example.com", "example.org", "example.net", "mail.test"];

const STREETS: &[&str] = &[
    "Maple", "Oak", "Cedar", "Elm", "Willow", "Harbor", "Hillside", "Lake", "Mill", "River",
];

const STREET_SUFFIXES: &[&str] = &["Street", "Avenue", "Road", "Lane", "Court", "Way"];

const WORDS: &[&str] = &[
    "amet", "aperiam", "beatae", "commodi", "dolor", "dolores", "eius", "eos", "facilis", "harum",
    "illum", "ipsum", "labore", "magni", "nemo", "nihil", "odio", "quasi", "quia", "ratione",
    "sequi", "sint", "tempora", "ullam", "velit", "vero", "voluptas",
];

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, items: &[&'a str]) -> &'a str {
    items.choose(rng).copied().unwrap_or_default()
}

fn sentence<R: Rng + ?Sized>(rng: &mut R) -> String {
    let len = rng.gen_range(6..=12);
    let words: Vec<&str> = (0..len).map(|_| pick(rng, WORDS)).collect();
    let text = words.join(" ");

    let mut chars = text.chars();
    match chars.next() {
        Some(c) => format!("{}{}.", c.to_ascii_uppercase(), chars.as_str()),
        None => String::new(),
    }
}

/// One generated user relative to `now`.
///
/// Birthdates give ages of 18 to 90, accounts were created within the past
/// two years, and half of them logged in at some point after creation.
pub fn user<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>) -> NewUser {
    let first = pick(rng, FIRST_NAMES);
    let last = pick(rng, LAST_NAMES);

    let email = format!(
        "{}.{}{}@{}",
        first.to_lowercase(),
        last.to_lowercase(),
        rng.gen_range(0..10_000_000),
        pick(rng, DOMAINS)
    );

    let birthdate = now - Duration::days(rng.gen_range(18 * 365..=90 * 365));
    let created_at = now - Duration::seconds(rng.gen_range(0..2 * 365 * SECONDS_PER_DAY));
    let last_login = rng.gen_bool(0.5).then(|| {
        let since_created = (now - created_at).num_seconds().max(0);
        created_at + Duration::seconds(rng.gen_range(0..=since_created))
    });

    NewUser {
        name: Some(format!("{first} {last}")),
        phone: Some(format!(
            "+1-{:03}-{:03}-{:04}",
            rng.gen_range(200..1000),
            rng.gen_range(0..1000),
            rng.gen_range(0..10_000)
        )),
        avatar: Some(format!("https://i.pravatar.cc/150?img={}", rng.gen_range(1..=70))),
        address: Some(format!(
            "{} {} {}",
            rng.gen_range(1..10_000),
            pick(rng, STREETS),
            pick(rng, STREET_SUFFIXES)
        )),
        bio: Some(sentence(rng)),
        birthdate: Some(birthdate),
        created_at: Some(created_at),
        last_login,
        ..NewUser::new(email)
    }
}

/// A batch of `count` generated users
pub fn users<R: Rng + ?Sized>(rng: &mut R, count: usize, now: DateTime<Utc>) -> Vec<NewUser> {
    (0..count).map(|_| user(rng, now)).collect()
}
