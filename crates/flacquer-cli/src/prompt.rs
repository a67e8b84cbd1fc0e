// SPDX-License-Identifier: GPL-3.0-or-later

use async_trait::async_trait;
use flacquer_application::ConfirmationPort;
use flacquer_domain::{Candidate, UserAction};
use std::io::{BufRead, Write};

/// Interactive confirmation over stdin. Re-prompts indefinitely on
/// unrecognized input; a closed stdin means no operator is present and
/// maps to `Quit`.
pub struct StdinConfirmation;

#[async_trait]
impl ConfirmationPort for StdinConfirmation {
    async fn resolve(&self, candidate: &Candidate) -> UserAction {
        let filename = candidate.target_filename();
        // The read blocks until the operator answers; keep it off the
        // async runtime.
        tokio::task::spawn_blocking(move || prompt_loop(&filename))
            .await
            .expect("confirmation prompt task panicked")
    }
}

fn prompt_loop(filename: &str) -> UserAction {
    let stdin = std::io::stdin();
    let mut input = String::new();

    loop {
        println!("Does this candidate match your file?");
        println!("    {filename}");
        println!("    1. Download");
        println!("    2. Skip");
        println!("    3. Exit");
        println!("    4. Quit");
        print!("Enter your choice: ");
        let _ = std::io::stdout().flush();

        input.clear();
        match stdin.lock().read_line(&mut input) {
            Ok(0) | Err(_) => return UserAction::Quit,
            Ok(_) => {}
        }

        match parse_choice(&input) {
            Some(action) => return action,
            None => println!("Invalid input. Please enter 1, 2, 3 or 4."),
        }
    }
}

pub fn parse_choice(input: &str) -> Option<UserAction> {
    match input.trim() {
        "1" => Some(UserAction::Download),
        "2" => Some(UserAction::Skip),
        "3" => Some(UserAction::Exit),
        "4" => Some(UserAction::Quit),
        _ => None,
    }
}
