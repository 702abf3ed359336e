//! Interactive confirmations on the terminal

use admin_ops::{ConfirmationGate, Confirmed, GateKey, InputState};
use colored::Colorize;
use std::io::{self, BufRead, Write};

/// Feed typed lines into `gate` until the operator presses Enter on an armed
/// input. An empty line or end of input cancels.
pub fn read_confirmation<R: BufRead, W: Write>(
    gate: &mut ConfirmationGate,
    mut input: R,
    mut output: W,
) -> io::Result<Option<Confirmed>> {
    gate.open();
    loop {
        write!(
            output,
            "Type {} to confirm (empty line cancels): ",
            gate.required_phrase().bold()
        )?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            gate.close();
            return Ok(None);
        }
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            gate.handle_key(GateKey::Escape);
            return Ok(None);
        }

        gate.update(line);
        if let Some(confirmed) = gate.handle_key(GateKey::Enter) {
            return Ok(Some(confirmed));
        }
        if gate.input_state() == InputState::Invalid {
            writeln!(
                output,
                "{} Input must match {} exactly",
                "✗".red(),
                gate.required_phrase()
            )?;
        }
    }
}

/// Check a phrase given up front on the command line
pub fn confirm_phrase(gate: &mut ConfirmationGate, phrase: &str) -> anyhow::Result<Confirmed> {
    gate.open();
    gate.update(phrase);
    gate.try_confirm().ok_or_else(|| {
        anyhow::anyhow!(
            "Confirmation phrase must be exactly {}",
            gate.required_phrase()
        )
    })
}

/// Ask a y/N question; anything but `y`/`yes` is a no
pub fn confirm<R: BufRead, W: Write>(question: &str, mut input: R, mut output: W) -> io::Result<bool> {
    write!(output, "{} [y/N] ", question)?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
