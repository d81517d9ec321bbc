//! Dashboard session.
//!
//! # Responsibility
//! - Own the state of all four dashboard features for one UI session.
//! - Turn delayed UI effects (bot replies, confirmation banners) into
//!   deferred tasks and apply them when the host ticks.
//!
//! # Invariants
//! - The mood log is restored exactly once, when the session opens.
//! - The confirmation banner is scheduled for every accepted mood, whether
//!   or not the snapshot reached the store. `MoodLogged::persisted` carries
//!   the durability result for hosts that want to warn.
//! - `tick` applies due tasks in deadline order and reports each one.

use crate::config::DashboardConfig;
use crate::model::input::InputError;
use crate::rules::meal::MealPlan;
use crate::rules::symptom::Diagnosis;
use crate::schedule::{DeferredQueue, TaskId};
use crate::service::chat_service::{ChatMessage, Conversation, PendingReply};
use crate::service::meal_service::MealPlanner;
use crate::service::mood_service::{MoodHistoryView, MoodLog, MoodLogged};
use crate::service::symptom_service::SymptomChecker;
use crate::store::KeyValueStore;
use chrono::{DateTime, FixedOffset};
use log::{info, warn};
use std::time::Duration;
use uuid::Uuid;

/// Display phase of a confirmation banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerPhase {
    Visible,
    FadingOut,
}

/// Transient "Mood logged" confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub id: u64,
    pub message: String,
    pub phase: BannerPhase,
}

/// Effect applied by [`Dashboard::tick`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardEvent {
    BotReplied { message_id: Uuid },
    BannerFading { banner_id: u64 },
    BannerDismissed { banner_id: u64 },
}

/// Handle for a bot reply that has not been shown yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyTicket {
    pub user_message_id: Uuid,
    pub task: TaskId,
    pub due_at: DateTime<FixedOffset>,
}

#[derive(Debug)]
enum DashboardTask {
    DeliverReply(PendingReply),
    FadeBanner(u64),
    DismissBanner(u64),
}

pub struct Dashboard<S: KeyValueStore> {
    config: DashboardConfig,
    moods: MoodLog<S>,
    chat: Conversation,
    symptoms: SymptomChecker,
    meals: MealPlanner,
    tasks: DeferredQueue<DashboardTask>,
    banners: Vec<Banner>,
    next_banner_id: u64,
}

impl<S: KeyValueStore> Dashboard<S> {
    /// Opens a session over `store`, restoring the mood log.
    pub fn open(store: S, config: DashboardConfig) -> Self {
        let moods = MoodLog::open(store, config.quota_retain_entries);
        info!(
            "event=dashboard_open module=dashboard status=ok moods={}",
            moods.len()
        );
        Self {
            config,
            moods,
            chat: Conversation::new(),
            symptoms: SymptomChecker::new(),
            meals: MealPlanner::new(),
            tasks: DeferredQueue::new(),
            banners: Vec::new(),
            next_banner_id: 1,
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Logs a mood and schedules its confirmation banner.
    pub fn log_mood(
        &mut self,
        label: &str,
        now: DateTime<FixedOffset>,
    ) -> Result<MoodLogged, InputError> {
        let logged = self.moods.log_mood_at(label, now)?;
        if !logged.persisted.is_durable() {
            warn!(
                "event=mood_confirm module=dashboard status=not_durable mood={}",
                logged.entry.mood()
            );
        }

        let banner_id = self.next_banner_id;
        self.next_banner_id += 1;
        self.banners.push(Banner {
            id: banner_id,
            message: format!("Mood logged: {}", logged.entry.mood()),
            phase: BannerPhase::Visible,
        });

        let visible = Duration::from_millis(self.config.banner_visible_ms);
        let fade = Duration::from_millis(self.config.banner_fade_ms);
        self.tasks.schedule(now, visible, DashboardTask::FadeBanner(banner_id));
        self.tasks.schedule(
            now,
            visible.saturating_add(fade),
            DashboardTask::DismissBanner(banner_id),
        );

        Ok(logged)
    }

    pub fn mood_history(&self, now: DateTime<FixedOffset>) -> MoodHistoryView {
        self.moods.render(now)
    }

    pub fn moods(&self) -> &MoodLog<S> {
        &self.moods
    }

    pub fn moods_mut(&mut self) -> &mut MoodLog<S> {
        &mut self.moods
    }

    /// Records a chat message; the reply appears after the thinking delay.
    pub fn send_message(
        &mut self,
        text: &str,
        now: DateTime<FixedOffset>,
    ) -> Result<ReplyTicket, InputError> {
        let reply = self.chat.submit(text, now)?;
        let delay = Duration::from_millis(self.config.reply_delay_ms);
        let task = self.tasks.schedule(now, delay, DashboardTask::DeliverReply(reply));
        let due_at = self.tasks.due_at(task).unwrap_or(now);

        Ok(ReplyTicket {
            user_message_id: reply.in_reply_to,
            task,
            due_at,
        })
    }

    /// Withdraws a reply that has not been delivered yet.
    pub fn cancel_reply(&mut self, ticket: &ReplyTicket) -> bool {
        self.tasks.cancel(ticket.task)
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.chat.messages()
    }

    pub fn toggle_symptom(&mut self, tag: &str) -> bool {
        self.symptoms.toggle(tag)
    }

    pub fn symptoms(&self) -> &SymptomChecker {
        &self.symptoms
    }

    pub fn symptoms_mut(&mut self) -> &mut SymptomChecker {
        &mut self.symptoms
    }

    pub fn analyze_symptoms(&self) -> Result<Diagnosis, InputError> {
        self.symptoms.analyze()
    }

    pub fn meals(&self) -> &MealPlanner {
        &self.meals
    }

    pub fn meals_mut(&mut self) -> &mut MealPlanner {
        &mut self.meals
    }

    pub fn generate_meal_plan(&self) -> Result<MealPlan, InputError> {
        self.meals.generate()
    }

    /// Banners currently on screen, oldest first.
    pub fn banners(&self) -> &[Banner] {
        &self.banners
    }

    /// Earliest deadline among pending effects.
    pub fn next_due(&self) -> Option<DateTime<FixedOffset>> {
        self.tasks.next_due()
    }

    /// Applies every effect due at `now`.
    pub fn tick(&mut self, now: DateTime<FixedOffset>) -> Vec<DashboardEvent> {
        self.tasks
            .drain_due(now)
            .into_iter()
            .map(|task| self.apply(task, now))
            .collect()
    }

    fn apply(&mut self, task: DashboardTask, now: DateTime<FixedOffset>) -> DashboardEvent {
        match task {
            DashboardTask::DeliverReply(reply) => {
                let message_id = self.chat.deliver(reply, now).id;
                DashboardEvent::BotReplied { message_id }
            }
            DashboardTask::FadeBanner(banner_id) => {
                if let Some(banner) = self.banners.iter_mut().find(|banner| banner.id == banner_id)
                {
                    banner.phase = BannerPhase::FadingOut;
                }
                DashboardEvent::BannerFading { banner_id }
            }
            DashboardTask::DismissBanner(banner_id) => {
                self.banners.retain(|banner| banner.id != banner_id);
                DashboardEvent::BannerDismissed { banner_id }
            }
        }
    }
}
