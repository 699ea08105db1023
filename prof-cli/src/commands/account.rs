//! Account commands: login, logout, whoami, register, profile edits,
//! password recovery.

use anyhow::Result;

use profesionales_core::ProfessionalExtras;
use profesionales_types::Identity;

use super::{prompt_password, Env};

/// Sign in.
pub async fn login(env: &Env, email: &str, password: Option<&str>) -> Result<()> {
    let mut screen = env.app.login_screen()?;
    screen.form.email = email.to_string();
    screen.form.password = match password {
        Some(p) => p.to_string(),
        None => prompt_password("Password: ")?,
    };

    let identity = screen.submit().await?;
    println!("Logged in as {} <{}>", identity.display_name(), identity.email);
    Ok(())
}

/// Sign out.
pub async fn logout(env: &Env) -> Result<()> {
    if env.app.session()?.current().is_none() {
        println!("Not logged in.");
        return Ok(());
    }
    env.app.account_screen()?.logout();
    println!("Logged out.");
    Ok(())
}

/// Show the signed-in user.
pub async fn whoami(env: &Env) -> Result<()> {
    let identity = env.identity()?;
    print_identity(&identity);
    if let Some(saved) = env.restored() {
        println!("  Since:      {}", format_timestamp(saved.saved_at));
    }
    Ok(())
}

fn print_identity(identity: &Identity) {
    println!("{}", identity.display_name());
    println!("  ID:         {}", identity.id);
    println!("  Email:      {}", identity.email);
    println!("  Role:       {}", identity.role.as_str());
    if let Some(phone) = &identity.phone {
        println!("  Phone:      {phone}");
    }
    if let Some(address) = &identity.address {
        println!("  Address:    {address}");
    }
    if let Some(fields) = identity.professional() {
        if let Some(profession) = &fields.profession {
            println!("  Profession: {profession}");
        }
        if !fields.specialties.is_empty() {
            println!("  Specialties: {}", fields.specialties.join(", "));
        }
        if let Some(years) = fields.years_of_experience {
            println!("  Experience: {years} years");
        }
        if let Some(radius) = fields.coverage_radius_km {
            println!("  Coverage:   {radius} km");
        }
    }
}

/// Fields shared by both registration kinds.
#[derive(Debug, Clone, Default)]
pub struct RegisterArgs {
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Email.
    pub email: String,
    /// Phone.
    pub phone: String,
    /// Address, geocoded before sending.
    pub address: String,
    /// Password; prompted twice when absent.
    pub password: Option<String>,
}

/// Create an account and sign in. `extras` registers a professional.
pub async fn register(
    env: &Env,
    args: RegisterArgs,
    extras: Option<ProfessionalExtras>,
) -> Result<()> {
    let mut screen = env.app.sign_up_screen()?;
    let (password, confirm) = match args.password {
        Some(p) => (p.clone(), p),
        None => (
            prompt_password("Password: ")?,
            prompt_password("Confirm password: ")?,
        ),
    };

    let form = &mut screen.form;
    form.first_name = args.first_name;
    form.last_name = args.last_name;
    form.email = args.email;
    form.phone = args.phone;
    form.address = args.address;
    form.password = password;
    form.confirm_password = confirm;
    form.professional = extras;

    let identity = screen.submit().await?;
    println!(
        "Registered {} as {}.",
        identity.display_name(),
        identity.role.as_str()
    );
    Ok(())
}

/// Edit the signed-in user's name, phone or address (kept locally).
pub async fn edit_profile(
    env: &Env,
    first_name: Option<String>,
    last_name: Option<String>,
    phone: Option<String>,
    address: Option<String>,
) -> Result<()> {
    env.identity()?;
    let screen = env.app.account_screen()?;
    let mut form = screen.edit_form()?;
    if let Some(v) = first_name {
        form.first_name = v;
    }
    if let Some(v) = last_name {
        form.last_name = v;
    }
    if let Some(v) = phone {
        form.phone = v;
    }
    if let Some(v) = address {
        form.address = v;
    }

    let identity = screen.save(&form)?;
    print_identity(&identity);
    Ok(())
}

/// Request a password reset. Nothing is sent to the backend.
pub async fn forgot_password(env: &Env, email: &str) -> Result<()> {
    let mut screen = env.app.forgot_password_screen();
    screen.form.email = email.to_string();
    let notice = screen.submit()?;
    println!("{notice}");
    Ok(())
}

/// Format a Unix timestamp as a human-readable string.
fn format_timestamp(ts: u64) -> String {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();

    let diff = now.saturating_sub(ts);

    if diff < 60 {
        "just now".to_string()
    } else if diff < 3600 {
        format!("{} minutes ago", diff / 60)
    } else if diff < 86400 {
        format!("{} hours ago", diff / 3600)
    } else {
        format!("{} days ago", diff / 86400)
    }
}
