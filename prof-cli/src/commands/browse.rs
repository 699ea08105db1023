//! Browsing commands: list, search and profile.

use anyhow::Result;

use profesionales_core::SearchView;
use profesionales_types::{ProfessionalProfile, UserId};

use super::Env;

fn print_card(profile: &ProfessionalProfile) {
    let rating = profile
        .average_rating()
        .map(|r| format!("  ★ {r:.1}"))
        .unwrap_or_default();
    println!(
        "  {:<26} {:<28} {}{}",
        profile.id,
        profile.display_name(),
        profile.profession_label(),
        rating
    );
}

/// List every professional.
pub async fn professionals(env: &Env) -> Result<()> {
    let mut screen = env.app.professionals_screen();
    let list = screen.refresh().await?;

    println!("{} professionals:", list.len());
    for profile in list {
        print_card(profile);
    }
    Ok(())
}

/// Search professionals by profession.
pub async fn search(env: &Env, term: &str) -> Result<()> {
    let screen = env.app.search_screen();
    screen.search(term).await?;

    screen.with_view(|view| match view {
        SearchView::Prompt(text) | SearchView::Empty(text) => println!("{text}"),
        SearchView::Failed(message) => println!("{message}"),
        SearchView::Loading => println!("..."),
        SearchView::Results(cards) => {
            for profile in cards {
                print_card(profile);
            }
        }
    });
    Ok(())
}

/// Show a professional's profile and the connection status.
pub async fn profile(env: &Env, id: &str) -> Result<()> {
    let mut screen = env.app.profile_screen()?;
    let profile = screen.enter(UserId::new(id)).await?.clone();

    println!("{}", profile.display_name());
    println!("  Profession: {}", profile.profession_label());
    if !profile.specialties.is_empty() {
        println!("  Specialties: {}", profile.specialties.join(", "));
    }
    if let Some(years) = profile.years_of_experience {
        println!("  Experience: {years} years");
    }
    if let Some(rating) = profile.average_rating() {
        println!("  Rating:     {rating:.1} ({} reviews)", profile.ratings.len());
    }
    for service in &profile.services {
        match service.price {
            Some(price) => println!("  - {} (${price})", service.name),
            None => println!("  - {}", service.name),
        }
    }
    if let Some(link) = screen.contact_link() {
        println!("  WhatsApp:   {link}");
    }

    let state = screen.state().await;
    let status = if state.is_connected() {
        "connected"
    } else {
        "not connected"
    };
    println!("  Status:     {status} [{}]", state.button_label());
    screen.leave().await;
    Ok(())
}
