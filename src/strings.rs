// src/strings.rs
// User-facing text for the game screen.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Spanish,
    English,
}

impl Language {
    pub fn strings(&self) -> &'static Strings {
        match self {
            Language::Spanish => &SPANISH,
            Language::English => &ENGLISH,
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spanish" | "es" => Ok(Language::Spanish),
            "english" | "en" => Ok(Language::English),
            other => Err(format!("unknown language '{other}' (expected spanish or english)")),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Spanish => f.write_str("spanish"),
            Language::English => f.write_str("english"),
        }
    }
}

#[derive(Debug)]
pub struct Strings {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub instructions_title: &'static str,
    pub click_instructions: &'static str,
    pub example: &'static str,
    pub click_number_one: &'static str,
    pub try_again: &'static str,
    pub congratulations: &'static str,
    pub completed: &'static str,
    pub time: &'static str,
    pub current_level: &'static str,
    pub play_again: &'static str,
    pub controls: &'static str,
}

pub static SPANISH: Strings = Strings {
    title: "Memoria dual",
    subtitle: "Mejora tu memoria y tu habilidad para hacer dos tareas a la vez",
    instructions_title: "Instrucciones",
    click_instructions: "Haz click en los números en orden intercalando entre los colores",
    example: "Ejemplo: (1 rojo, 2 azul, 3 rojo, 4 azul, 5 rojo, 6 azul)",
    click_number_one: "Haz click en el número 1 para comenzar",
    try_again: "Intentalo de nuevo desde el comienzo",
    congratulations: "¡Felicidades!",
    completed: "Has completado el nivel con exito",
    time: "Tiempo",
    current_level: "Nivel Actual",
    play_again: "Jugar de nuevo (2 circulos mas)",
    controls: "Flechas: mover  Enter: elegir  n: siguiente nivel  i: instrucciones  q: salir",
};

pub static ENGLISH: Strings = Strings {
    title: "Dual memory",
    subtitle: "Improve your memory and your ability to do two tasks at once",
    instructions_title: "Instructions",
    click_instructions: "Click the numbers in order, alternating between the colors",
    example: "Example: (1 red, 2 blue, 3 red, 4 blue, 5 red, 6 blue)",
    click_number_one: "Click number 1 to start",
    try_again: "Try again from the beginning",
    congratulations: "Congratulations!",
    completed: "You have completed the level",
    time: "Time",
    current_level: "Current level",
    play_again: "Play again (2 more circles)",
    controls: "Arrows: move  Enter: pick  n: next level  i: instructions  q: quit",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_str() {
        assert_eq!("Spanish".parse::<Language>(), Ok(Language::Spanish));
        assert_eq!("en".parse::<Language>(), Ok(Language::English));
        assert!("french".parse::<Language>().is_err());
    }

    #[test]
    fn test_language_display_round_trips() {
        for lang in [Language::Spanish, Language::English] {
            assert_eq!(lang.to_string().parse::<Language>(), Ok(lang));
        }
    }

    #[test]
    fn test_strings_lookup() {
        assert_eq!(Language::Spanish.strings().time, "Tiempo");
        assert_eq!(Language::English.strings().current_level, "Current level");
    }
}
