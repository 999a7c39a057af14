use chrono::Local;
use colored::Colorize;
use geoweather_core::{PanelView, WeatherCard, view::LOADING_TEXT};

/// Key field and save control; always shown.
pub fn print_controls(view: &PanelView) {
    let field = if view.key_is_placeholder {
        view.key_field.dimmed()
    } else {
        view.key_field.normal()
    };

    println!("{}{}", view.key_label, field);
    println!("[ {} ]", view.button_label.bold());
}

/// Shown while a cycle with a non-empty key is in flight.
pub fn print_loading() {
    println!("{LOADING_TEXT}⏳");
}

/// Loading indicator, error line or weather card, whichever apply.
pub fn print_status(view: &PanelView) {
    if view.loading {
        print_loading();
    }

    if let Some(error) = &view.error {
        println!("{}", error.red());
    }

    if let Some(card) = &view.weather {
        print_card(card);
    }
}

fn print_card(card: &WeatherCard) {
    println!();
    println!("{}", card.location_name.bold());
    println!("Icon: {}", card.icon_url);
    println!("Temperature: {}°C", card.temperature_c);
    println!("Weather: {}", card.description);

    if let Some(observed) = card.observed_at {
        let local = observed.with_timezone(&Local);
        println!("{}", format!("Observed at {}", local.format("%Y-%m-%d %H:%M")).dimmed());
    }
}
