//! Interactive chat loop.
//!
//! Lines starting with `/` are commands; anything else is sent to the
//! concierge as a chat message. One turn runs at a time and input is not
//! read while a turn is streaming. Ctrl-C cancels a running turn by
//! dropping its stream; at the prompt it exits.

use std::future::Future;
use std::io::{self, Write};

use chrono::{Local, Utc};
use futures::stream::BoxStream;
use futures::StreamExt;
use lg_client::mock::mock_stream;
use lg_client::{AccountClient, ChatClient, ClientError, MockConfig};
use lg_protocol::{find_card, CardSlug, ChatEvent};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

use crate::approval::{estimate, Applicant, ApprovalForm, FormField};
use crate::config::Config;
use crate::display::{render_panel, render_transcript, TranscriptPrinter};
use crate::preview::PreviewPanel;
use crate::reducer::ChatState;
use crate::session::{Capability, Session};
use crate::style::Style;
use crate::views;

const HELP: &str = "\
Commands:
  <text>                    Send a message to the concierge
  /open <n>                 Open preview [n] from the conversation
  /close                    Close the open preview
  /history                  Reprint the conversation
  /cards                    Show the card catalog
  /benefits                 Show cardholder benefits
  /account                  Show your account page
  /estimate <card> [salary net_worth age fico]
                            Estimate approval odds (from your profile if signed in)
  /apply <card>             Apply for a card
  /login <user> <password>  Sign in
  /me                       Refresh and show your profile
  /logout                   Sign out
  /help                     Show this help
  /quit                     Exit";

/// Where chat turns are sent.
pub enum ChatBackend {
    Http(ChatClient),
    /// Replays the same scripted turn for every message.
    Mock(MockConfig),
}

impl ChatBackend {
    pub fn stream(
        &self,
        message: &str,
        session_id: &str,
    ) -> BoxStream<'static, Result<ChatEvent, ClientError>> {
        match self {
            Self::Http(client) => client.stream(message, session_id).boxed(),
            Self::Mock(config) => mock_stream(config.clone()).boxed(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Chat(String),
    Open(usize),
    Close,
    History,
    Cards,
    Benefits,
    Account,
    Estimate {
        card: CardSlug,
        answers: Option<[String; 4]>,
    },
    Apply(CardSlug),
    Login {
        username: String,
        password: String,
    },
    Me,
    Logout,
    Help,
    Quit,
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Some(Command::Chat(line.to_string())));
    };

    let mut words = rest.split_whitespace();
    let name = words.next().unwrap_or("");
    let args: Vec<&str> = words.collect();

    let command = match (name, args.as_slice()) {
        ("open", [n]) => Command::Open(
            n.parse()
                .map_err(|_| format!("'{n}' is not a preview number"))?,
        ),
        ("open", _) => return Err("usage: /open <n>".to_string()),
        ("close", []) => Command::Close,
        ("history", []) => Command::History,
        ("cards", []) => Command::Cards,
        ("benefits", []) => Command::Benefits,
        ("account", []) => Command::Account,
        ("estimate", [card]) => Command::Estimate {
            card: card.parse()?,
            answers: None,
        },
        ("estimate", [card, salary, net_worth, age, fico]) => Command::Estimate {
            card: card.parse()?,
            answers: Some([
                salary.to_string(),
                net_worth.to_string(),
                age.to_string(),
                fico.to_string(),
            ]),
        },
        ("estimate", _) => {
            return Err("usage: /estimate <card> [salary net_worth age fico]".to_string())
        }
        ("apply", [card]) => Command::Apply(card.parse()?),
        ("apply", _) => return Err("usage: /apply <card>".to_string()),
        ("login", [username, password]) => Command::Login {
            username: username.to_string(),
            password: password.to_string(),
        },
        ("login", _) => return Err("usage: /login <user> <password>".to_string()),
        ("me", []) => Command::Me,
        ("logout", []) => Command::Logout,
        ("help", _) => Command::Help,
        ("quit" | "exit", []) => Command::Quit,
        (other, _) => return Err(format!("unknown command '/{other}', try /help")),
    };
    Ok(Some(command))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    Completed,
    Failed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App {
    backend: ChatBackend,
    accounts: Option<AccountClient>,
    session: Session,
    state: ChatState,
    printer: TranscriptPrinter,
    panel: PreviewPanel,
    session_id: String,
    style: Style,
    force_previews: bool,
}

impl App {
    pub fn new(
        config: &Config,
        backend: ChatBackend,
        accounts: Option<AccountClient>,
        session: Session,
        style: Style,
    ) -> Self {
        let state = ChatState::with_greeting(
            config.chat.initial_agent.as_str(),
            &config.chat.greeting,
            Utc::now(),
        );
        let mut app = Self {
            backend,
            accounts,
            session,
            state,
            printer: TranscriptPrinter::new(style, false),
            panel: PreviewPanel::new(),
            session_id: config.chat.session_id(),
            style,
            force_previews: config.chat.previews,
        };
        app.sync_capabilities();
        app
    }

    pub fn state(&self) -> &ChatState {
        &self.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn panel(&self) -> &PreviewPanel {
        &self.panel
    }

    pub fn previews_enabled(&self) -> bool {
        self.force_previews || self.session.has_capability(Capability::PreviewPanel)
    }

    fn sync_capabilities(&mut self) {
        let enabled = self.previews_enabled();
        self.printer.set_previews(enabled);
        if !enabled {
            self.panel.close();
        }
    }

    /// Refresh the stored profile and print the greeting.
    pub async fn start<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        if let Some(accounts) = &self.accounts {
            if let Some(Err(e)) = interruptible(self.session.refresh(accounts)).await {
                warn!(error = %e, "could not refresh profile");
            }
        }
        self.sync_capabilities();
        write!(out, "{}", self.printer.sync(&self.state.messages, true))?;
        out.flush()
    }

    /// Send one message and stream the reply to `out`.
    pub async fn run_turn<W: Write>(&mut self, text: &str, out: &mut W) -> io::Result<TurnOutcome> {
        self.state.submit_user(text, Utc::now());
        write!(out, "{}", self.printer.sync(&self.state.messages, false))?;

        let mut stream = self.backend.stream(text, &self.session_id);
        let outcome = tokio::select! {
            result = pump(&mut stream, &mut self.state, &mut self.printer, &mut *out) => result?,
            _ = tokio::signal::ctrl_c() => TurnOutcome::Cancelled,
        };
        drop(stream);
        debug!(?outcome, "turn finished");

        self.state.loading = false;
        write!(out, "{}", self.printer.sync(&self.state.messages, true))?;
        if outcome == TurnOutcome::Cancelled {
            writeln!(out, "{}", self.style.dim("(cancelled)"))?;
        }
        out.flush()?;
        Ok(outcome)
    }

    pub async fn handle<W: Write>(&mut self, command: Command, out: &mut W) -> io::Result<Flow> {
        match command {
            Command::Chat(text) => {
                self.run_turn(&text, out).await?;
            }
            Command::Open(n) => self.open_preview(n, out)?,
            Command::Close => {
                self.panel.close();
            }
            Command::History => {
                let previews = self.previews_enabled();
                write!(
                    out,
                    "{}",
                    render_transcript(&self.state.messages, self.style, previews)
                )?;
            }
            Command::Cards => write!(out, "{}", views::card_catalog(&self.style))?,
            Command::Benefits => write!(out, "{}", views::benefits(&self.style))?,
            Command::Account => write!(out, "{}", views::account(self.session.user(), &self.style))?,
            Command::Estimate { card, answers } => self.estimate(card, answers, out)?,
            Command::Apply(card) => self.apply(card, out).await?,
            Command::Login { username, password } => self.login(&username, &password, out).await?,
            Command::Me => self.me(out).await?,
            Command::Logout => {
                self.session.logout();
                self.sync_capabilities();
                writeln!(out, "Signed out.")?;
            }
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => return Ok(Flow::Quit),
        }
        out.flush()?;
        Ok(Flow::Continue)
    }

    fn open_preview<W: Write>(&mut self, n: usize, out: &mut W) -> io::Result<()> {
        if !self.previews_enabled() {
            return writeln!(
                out,
                "{}",
                self.style
                    .dim("Preview panels are a Tribune cardholder benefit. See /benefits.")
            );
        }
        let Some(href) = self.printer.link(n).map(str::to_string) else {
            return writeln!(out, "{}", self.style.red(&format!("No preview [{n}].")));
        };
        if !self.panel.open_link(&href) {
            return writeln!(out, "{}", self.style.red("That preview could not be opened."));
        }
        if let Some(panel) = self.panel.panel() {
            writeln!(out, "{}", render_panel(&panel, &self.style, terminal_width()))?;
        }
        Ok(())
    }

    fn estimate<W: Write>(
        &mut self,
        slug: CardSlug,
        answers: Option<[String; 4]>,
        out: &mut W,
    ) -> io::Result<()> {
        let card = find_card(slug);
        let tier = match answers {
            Some(answers) => {
                let mut form = ApprovalForm::new();
                for (field, value) in FormField::ALL.into_iter().zip(answers) {
                    form.set_field(field, value);
                }
                match form.submit(card) {
                    Ok(tier) => tier,
                    Err(errors) => {
                        for (field, message) in errors {
                            writeln!(out, "{} {message}", self.style.red(&format!("{field}:")))?;
                        }
                        return Ok(());
                    }
                }
            }
            None => {
                let today = Local::now().date_naive();
                match self.session.user().and_then(|u| Applicant::from_user(u, today)) {
                    Some(applicant) => estimate(&card.approval_thresholds, &applicant),
                    None => {
                        return writeln!(
                            out,
                            "Sign in to estimate from your profile, or use \
                             /estimate {slug} <salary> <net_worth> <age> <fico>."
                        );
                    }
                }
            }
        };
        write!(out, "{}", views::approval_odds(card, tier, &self.style))
    }

    async fn login<W: Write>(&mut self, username: &str, password: &str, out: &mut W) -> io::Result<()> {
        let Some(accounts) = &self.accounts else {
            return writeln!(out, "{}", self.style.red("Accounts are unavailable in offline mode."));
        };
        let Some(result) = interruptible(accounts.login(username, password)).await else {
            return writeln!(out, "{}", self.style.dim("(cancelled)"));
        };
        match result {
            Ok(response) => {
                if let Err(e) = self.session.sign_in(response) {
                    warn!(error = %e, "could not persist session");
                }
                self.sync_capabilities();
                let name = self.session.user().map(|u| u.username.as_str()).unwrap_or(username);
                writeln!(out, "Signed in as {}.", self.style.bold(name))
            }
            Err(ClientError::Unauthorized) => {
                writeln!(out, "{}", self.style.red("Invalid username or password."))
            }
            Err(e) => writeln!(out, "{}", self.style.red(&format!("Login failed: {e}"))),
        }
    }

    async fn me<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        let Some(accounts) = self.accounts.clone() else {
            return writeln!(out, "{}", self.style.red("Accounts are unavailable in offline mode."));
        };
        let Some(result) = interruptible(self.session.refresh(&accounts))
            .await
            .map(|r| r.map(|u| u.cloned()))
        else {
            return writeln!(out, "{}", self.style.dim("(cancelled)"));
        };
        self.sync_capabilities();
        match result {
            Ok(Some(user)) => {
                let card = user
                    .current_card
                    .map(|c| find_card(c).name)
                    .unwrap_or("none");
                writeln!(out, "{} <{}>", self.style.bold(&user.username), user.email)?;
                writeln!(out, "  Card:         {card}")?;
                writeln!(out, "  Credit score: {}", user.credit_score)?;
                if let Some(rate) = user.interest_rate {
                    writeln!(out, "  APR:          {rate}%")?;
                }
                Ok(())
            }
            Ok(None) => writeln!(out, "Not signed in. Use /login <user> <password>."),
            Err(e) => self.report_account_error(&e, out),
        }
    }

    async fn apply<W: Write>(&mut self, slug: CardSlug, out: &mut W) -> io::Result<()> {
        let Some(accounts) = self.accounts.clone() else {
            return writeln!(out, "{}", self.style.red("Accounts are unavailable in offline mode."));
        };
        let Some(token) = self.session.token().map(str::to_string) else {
            return writeln!(out, "Sign in first with /login <user> <password>.");
        };
        let Some(result) = interruptible(accounts.apply_for_card(&token, slug)).await else {
            return writeln!(out, "{}", self.style.dim("(cancelled)"));
        };
        match result {
            Ok(response) => {
                write!(out, "{}", views::application_result(&response, &self.style))?;
                if let Some(Err(e)) = interruptible(self.session.refresh(&accounts)).await {
                    warn!(error = %e, "could not refresh profile after application");
                }
                self.sync_capabilities();
                Ok(())
            }
            Err(e) => {
                self.session.handle_error(&e);
                self.sync_capabilities();
                self.report_account_error(&e, out)
            }
        }
    }

    fn report_account_error<W: Write>(&self, error: &ClientError, out: &mut W) -> io::Result<()> {
        if error.is_unauthorized() {
            writeln!(out, "{}", self.style.red("Your session has expired. Please /login again."))
        } else {
            writeln!(out, "{}", self.style.red(&format!("Request failed: {error}")))
        }
    }
}

/// Await an account request unless Ctrl-C arrives first.
async fn interruptible<T>(request: impl Future<Output = T>) -> Option<T> {
    until_cancelled(request, async {
        if tokio::signal::ctrl_c().await.is_err() {
            futures::future::pending::<()>().await;
        }
    })
    .await
}

async fn until_cancelled<T>(
    request: impl Future<Output = T>,
    cancel: impl Future<Output = ()>,
) -> Option<T> {
    tokio::select! {
        result = request => Some(result),
        _ = cancel => None,
    }
}

async fn pump<W: Write>(
    stream: &mut BoxStream<'static, Result<ChatEvent, ClientError>>,
    state: &mut ChatState,
    printer: &mut TranscriptPrinter,
    out: &mut W,
) -> io::Result<TurnOutcome> {
    while let Some(item) = stream.next().await {
        match item {
            Ok(event) => {
                let done = event == ChatEvent::Done;
                state.apply(&event, Utc::now());
                write!(out, "{}", printer.sync(&state.messages, false))?;
                out.flush()?;
                if done {
                    break;
                }
            }
            Err(e) => {
                warn!(error = %e, "chat turn failed");
                state.fail_turn(Utc::now());
                return Ok(TurnOutcome::Failed);
            }
        }
    }
    Ok(TurnOutcome::Completed)
}

fn terminal_width() -> usize {
    crossterm::terminal::size()
        .map(|(w, _)| usize::from(w))
        .unwrap_or(80)
}

/// Read commands from stdin until `/quit`, end of input or Ctrl-C.
pub async fn run_repl(mut app: App) -> io::Result<()> {
    let mut stdout = io::stdout();
    let style = app.style;
    app.start(&mut stdout).await?;
    writeln!(stdout, "{}", style.dim("Type /help for commands."))?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        write!(stdout, "\n{} ", style.bold("›"))?;
        stdout.flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            writeln!(stdout)?;
            break;
        };

        match parse_command(&line) {
            Ok(None) => {}
            Ok(Some(command)) => {
                if app.handle(command, &mut stdout).await? == Flow::Quit {
                    break;
                }
            }
            Err(message) => writeln!(stdout, "{}", style.red(&message))?,
        }
    }
    Ok(())
}
