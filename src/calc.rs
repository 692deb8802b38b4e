//! An interactive four-function calculator.
//!
//! The loop is written against `BufRead`/`Write` so it can run over stdin/stdout or over in-memory
//! buffers.

use crate::Result;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};
use tracing::debug;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

serde_plain::derive_display_from_serialize!(Operation);
serde_plain::derive_fromstr_from_deserialize!(Operation);

impl Operation {
    /// Maps a menu choice (`"1"` to `"4"`) to its operation.
    pub fn from_menu(choice: &str) -> Option<Self> {
        match choice {
            "1" => Some(Self::Add),
            "2" => Some(Self::Subtract),
            "3" => Some(Self::Multiply),
            "4" => Some(Self::Divide),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '*',
            Self::Divide => '/',
        }
    }

    /// Returns `None` when dividing by zero.
    pub fn apply(self, a: f64, b: f64) -> Option<f64> {
        match self {
            Self::Add => Some(a + b),
            Self::Subtract => Some(a - b),
            Self::Multiply => Some(a * b),
            Self::Divide if b == 0.0 => None,
            Self::Divide => Some(a / b),
        }
    }
}

const MENU: &str = "=== CALCULADORA ===
Operaciones disponibles:
1. Suma (+)
2. Resta (-)
3. Multiplicación (*)
4. División (/)
5. Salir";

/// Runs the calculator until the user picks option 5 or `input` is exhausted. Returns the number
/// of operations that produced a result.
pub fn run(mut input: impl BufRead, mut output: impl Write) -> Result<usize> {
    writeln!(output, "{MENU}").context("Unable to write to the console")?;
    let mut computed = 0;
    loop {
        writeln!(output, "\n{}", "-".repeat(30)).context("Unable to write to the console")?;
        let choice = match prompt(&mut input, &mut output, "Selecciona una operación (1-5): ")? {
            Some(choice) => choice,
            None => break,
        };
        if choice == "5" {
            writeln!(output, "¡Hasta luego!").context("Unable to write to the console")?;
            break;
        }
        let operation = match Operation::from_menu(&choice) {
            Some(operation) => operation,
            None => {
                writeln!(
                    output,
                    "Operación no válida. Por favor, selecciona una opción del 1 al 5."
                )
                .context("Unable to write to the console")?;
                continue;
            }
        };

        let a = match read_number(&mut input, &mut output, "Ingresa el primer número: ")? {
            Entry::Number(n) => n,
            Entry::Invalid => continue,
            Entry::Eof => break,
        };
        let b = match read_number(&mut input, &mut output, "Ingresa el segundo número: ")? {
            Entry::Number(n) => n,
            Entry::Invalid => continue,
            Entry::Eof => break,
        };

        debug!("{operation}: {a} {} {b}", operation.symbol());
        match operation.apply(a, b) {
            Some(result) => {
                computed += 1;
                writeln!(
                    output,
                    "\nResultado: {a} {} {b} = {result}",
                    operation.symbol()
                )
                .context("Unable to write to the console")?;
            }
            None => writeln!(output, "Error: No se puede dividir por cero.")
                .context("Unable to write to the console")?,
        }
    }
    Ok(computed)
}

enum Entry {
    Number(f64),
    Invalid,
    Eof,
}

fn read_number(input: &mut impl BufRead, output: &mut impl Write, question: &str) -> Result<Entry> {
    let line = match prompt(input, output, question)? {
        Some(line) => line,
        None => return Ok(Entry::Eof),
    };
    match line.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(Entry::Number(n)),
        _ => {
            writeln!(output, "Error: Por favor, ingresa números válidos.")
                .context("Unable to write to the console")?;
            Ok(Entry::Invalid)
        }
    }
}

/// Writes `question` and reads one trimmed line. `None` at end of input.
fn prompt(
    input: &mut impl BufRead,
    output: &mut impl Write,
    question: &str,
) -> Result<Option<String>> {
    write!(output, "{question}").context("Unable to write to the console")?;
    output.flush().context("Unable to write to the console")?;
    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .context("Unable to read from the console")?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
