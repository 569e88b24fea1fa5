use colored::Colorize;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use gititer_core::models::non_empty;
use gititer_core::{ChoiceItem, ChoicePick, Error, PromptService, Result, TextPrompt};

fn prompt_error(e: dialoguer::Error) -> Error {
    Error::Prompt(e.to_string())
}

/// Prompts on the controlling terminal. An empty answer or Esc dismisses.
#[derive(Default)]
pub struct TerminalPrompt {
    theme: ColorfulTheme,
}

impl TerminalPrompt {
    fn read_text(&self, label: &str, initial: &str) -> Result<Option<String>> {
        let answer: String = Input::with_theme(&self.theme)
            .with_prompt(label)
            .with_initial_text(initial)
            .allow_empty(true)
            .interact_text()
            .map_err(prompt_error)?;
        Ok(non_empty(answer))
    }
}

impl PromptService for TerminalPrompt {
    fn ask_text(&self, request: &TextPrompt) -> Result<Option<String>> {
        println!("{}", request.prompt.bold());
        self.read_text(&request.placeholder, &request.default)
    }

    fn ask_choice(&self, items: &[ChoiceItem]) -> Result<Option<ChoicePick>> {
        let labels: Vec<String> = items
            .iter()
            .map(|item| {
                if item.description.is_empty() {
                    item.label.clone()
                } else {
                    format!("{}  {}", item.label, item.description.dimmed())
                }
            })
            .collect();

        let Some(index) = Select::with_theme(&self.theme)
            .items(&labels)
            .default(0)
            .interact_opt()
            .map_err(prompt_error)?
        else {
            return Ok(None);
        };

        let mut pick = ChoicePick::new(index);
        if items[index].accepts_text {
            if let Some(text) = self.read_text("New commit message", "")? {
                pick = pick.with_text(text);
            }
        }

        Ok(Some(pick))
    }
}
