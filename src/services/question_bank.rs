//! Static bank of elicitation prompts, tagged by axis, type and tier.

use crate::domain::models::{Axis, AxisTier, Question, QuestionType};

use Axis as A;
use QuestionType as Q;

pub static QUESTIONS: &[Question] = &[
    // Tier 1
    Question::new("maslow_basics", A::MaslowStatus, Q::Open, "How are things on the practical side lately: sleep, money, a place that feels safe?"),
    Question::new("maslow_belonging", A::MaslowStatus, Q::Reflective, "Who do you feel you can really count on right now?"),
    Question::new("maslow_growth", A::MaslowStatus, Q::Open, "If the basics were fully handled, what would you want to spend your energy on?"),
    Question::new("support_style_preference", A::SupportSeekingStyle, Q::Open, "When something is bothering you, do you usually want solutions, or mostly someone to listen?"),
    Question::new("support_style_scenario", A::SupportSeekingStyle, Q::Scenario, "Imagine a friend notices you've had a rough week. What would you most want them to do?"),
    Question::new("life_work", A::LifeSituation, Q::Open, "What does a typical week look like for you, work-wise?"),
    Question::new("life_home", A::LifeSituation, Q::Open, "Who do you share your day-to-day life with at home?"),
    Question::new("life_health", A::LifeSituation, Q::Scaled, "On a scale of 1 to 10, how is your health treating you these days?"),
    Question::new("intent_today", A::ImmediateIntent, Q::Open, "What would make this conversation worthwhile for you today?"),
    Question::new("intent_mode", A::ImmediateIntent, Q::Reflective, "Are you looking to think something through, get it off your chest, or decide on something?"),
    // Tier 2
    Question::new("values_core", A::CoreValues, Q::Open, "What matters most to you, the things you wouldn't compromise on?"),
    Question::new("values_proud", A::CoreValues, Q::Reflective, "Think of a time you were proud of how you handled something. What made it feel right?"),
    Question::new("values_tradeoff", A::CoreValues, Q::Scenario, "If you had to choose between a job that pays well and one that feels meaningful, which way would you lean?"),
    Question::new("challenges_current", A::CurrentChallenges, Q::Open, "What's been weighing on you most lately?"),
    Question::new("challenges_recurring", A::CurrentChallenges, Q::Reflective, "Is there something that keeps coming back, no matter how many times you deal with it?"),
    Question::new("goals_near", A::Goals, Q::Open, "What are you working toward at the moment?"),
    Question::new("goals_year", A::Goals, Q::Reflective, "A year from now, what would you like to be different?"),
    Question::new("moral_fairness", A::MoralFoundations, Q::Scenario, "If a colleague took credit for someone else's work, how would that sit with you?"),
    Question::new("moral_loyalty", A::MoralFoundations, Q::Reflective, "When loyalty to people you care about conflicts with doing what's fair, how do you decide?"),
    // Tier 3
    Question::new("big_five_social", A::BigFive, Q::Open, "After a long week, does time with people recharge you or wear you out?"),
    Question::new("big_five_planning", A::BigFive, Q::Scaled, "How much do you like to plan ahead, from 1 (go with the flow) to 10 (everything scheduled)?"),
    Question::new("big_five_novelty", A::BigFive, Q::Open, "How do you feel about trying things you've never done before?"),
    Question::new("risk_money", A::RiskTolerance, Q::Scenario, "If you were offered a safe salary or a riskier deal with a bigger upside, which would you pick?"),
    Question::new("risk_general", A::RiskTolerance, Q::Scaled, "On a scale of 1 to 10, how comfortable are you taking chances?"),
    Question::new("motivation_source", A::MotivationStyle, Q::Open, "What gets you moving on a hard task: the reward at the end, or the work itself?"),
    Question::new("motivation_recognition", A::MotivationStyle, Q::Reflective, "How much does it matter to you that others notice your effort?"),
    // Tier 4
    Question::new("attachment_closeness", A::AttachmentStyle, Q::Reflective, "When someone gets close to you, do you tend to lean in or keep a bit of distance?"),
    Question::new("attachment_conflict", A::AttachmentStyle, Q::Scenario, "If someone you love goes quiet for a day, what goes through your mind?"),
    Question::new("locus_outcomes", A::LocusOfControl, Q::Reflective, "When things go well, how much of that do you put down to your own doing versus luck?"),
    Question::new("locus_setback", A::LocusOfControl, Q::Open, "Think of a recent setback. What do you think caused it?"),
    Question::new("temporal_focus", A::TemporalOrientation, Q::Open, "Do you find yourself thinking more about the past, the present, or the future?"),
    Question::new("temporal_tradeoff", A::TemporalOrientation, Q::Scenario, "Would you rather have something good now or something better in a year?"),
    Question::new("growth_ability", A::GrowthMindset, Q::Reflective, "Do you think people can really change how good they are at things, or are talents mostly fixed?"),
    Question::new("growth_failure", A::GrowthMindset, Q::Open, "How do you usually react when you fail at something new?"),
    Question::new("change_ready", A::ChangeReadiness, Q::Scaled, "How ready do you feel, from 1 to 10, to change something important in your life?"),
    Question::new("change_blockers", A::ChangeReadiness, Q::Open, "Is there a change you keep meaning to make? What's held it back?"),
    Question::new("stress_reaction", A::StressResponse, Q::Open, "When pressure builds up, what do you tend to do?"),
    Question::new("stress_signs", A::StressResponse, Q::Reflective, "How do you notice you're stressed before anyone else does?"),
    Question::new("emotion_strong", A::EmotionalRegulation, Q::Open, "When a strong feeling hits, how do you usually handle it?"),
    Question::new("emotion_recovery", A::EmotionalRegulation, Q::Scaled, "After getting upset, how quickly do you bounce back, from 1 (slowly) to 10 (right away)?"),
    Question::new("efficacy_confidence", A::SelfEfficacy, Q::Scaled, "How confident are you, from 1 to 10, that you can handle whatever comes up this month?"),
    Question::new("efficacy_challenge", A::SelfEfficacy, Q::Reflective, "Think of something hard you pulled off. What made you believe you could do it?"),
];

/// Read-only view over a set of questions.
#[derive(Debug, Clone, Copy)]
pub struct QuestionBank {
    questions: &'static [Question],
}

impl Default for QuestionBank {
    fn default() -> Self {
        Self::new(QUESTIONS)
    }
}

impl QuestionBank {
    pub fn new(questions: &'static [Question]) -> Self {
        Self { questions }
    }

    pub fn all(&self) -> &'static [Question] {
        self.questions
    }

    pub fn get(&self, id: &str) -> Option<&'static Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn for_axis(&self, axis: Axis) -> Vec<&'static Question> {
        self.questions.iter().filter(|q| q.axis == axis).collect()
    }

    /// Pick a question for `axis`, cycling through its questions as `rotation` grows.
    pub fn select(&self, axis: Axis, rotation: usize) -> Option<&'static Question> {
        let candidates = self.for_axis(axis);
        if candidates.is_empty() {
            return None;
        }
        Some(candidates[rotation % candidates.len()])
    }

    /// Case-insensitive substring match over question text.
    pub fn search(&self, text: &str) -> Vec<&'static Question> {
        let needle = text.trim().to_lowercase();
        self.questions
            .iter()
            .filter(|q| q.text.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn by_tier(&self, tier: AxisTier) -> Vec<&'static Question> {
        self.questions.iter().filter(|q| q.tier() == tier).collect()
    }
}
