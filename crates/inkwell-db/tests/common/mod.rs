#![allow(dead_code)]

use inkwell_db::Database;
use inkwell_types::credentials::{generate_activation_token, generate_salt};
use inkwell_types::{Article, Clap, DateInput, Profile, ProfileFields};
use uuid::Uuid;

pub fn db() -> Database {
    Database::open_in_memory().unwrap()
}

pub fn profile(full_name: &str, email: &str) -> Profile {
    build_profile(full_name, email, None)
}

pub fn profile_with_token(full_name: &str, email: &str) -> Profile {
    build_profile(full_name, email, Some(&generate_activation_token()))
}

fn build_profile(full_name: &str, email: &str, token: Option<&str>) -> Profile {
    let hash = "0f".repeat(64);
    let salt = generate_salt();
    Profile::new(ProfileFields {
        profile_id: Uuid::new_v4().into(),
        activation_token: token,
        full_name,
        caption: "hobbyist writer",
        email,
        hash: &hash,
        phone: Some("5055550100"),
        salt: &salt,
    })
    .unwrap()
}

pub fn article(author: &Profile, content: &str) -> Article {
    Article::new(Uuid::new_v4(), author.id(), content, DateInput::Now).unwrap()
}

pub fn clap(article: &Article, profile: &Profile) -> Clap {
    Clap::new(article.id(), profile.id(), DateInput::Now).unwrap()
}
