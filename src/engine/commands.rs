//! Administrative command surface, served from private chats.

use tracing::info;

use super::{InboundMessage, PredictionEngine, ResetSource};
use crate::outbound::PredictionPublisher;

const START_TEXT: &str = "🤖 **Bot de Prédiction Baccarat**\n\n\
    Commandes: `/status`, `/help`, `/debug`, `/reset`";

const HELP_TEXT: &str = "📖 **Aide - Bot de Prédiction Baccarat**\n\n\
    **Règles de prédiction:**\n\
    Le bot lit le 2ème groupe du message source et prend la 1ère carte (couleur).\n\
    La prédiction est envoyée IMMÉDIATEMENT (n'attend pas la finalisation).\n\n\
    **Vérification:**\n\
    Attend que le message soit finalisé (✅ ou 🔰).\n\
    Vérifie si le costume prédit est dans le PREMIER groupe.\n\n\
    **Transformation selon parité du jeu:**\n\
    • Jeux PAIRS (ex: #1220):\n  ♠️→♣️, ♣️→♠️, ♦️→♥️, ♥️→♦️\n\n\
    • Jeux IMPAIRS (ex: #1219):\n  ♠️→♥️, ♣️→♦️, ♦️→♣️, ♥️→♠️\n\n\
    **Prédiction:** Toujours pour le jeu N+1\n\n\
    **Reset automatique:**\n\
    • Toutes les 2 heures\n\
    • Quotidien à 00h59 WAT\n\n\
    **Commandes:**\n\
    • `/start` - Démarrer le bot\n\
    • `/status` - Voir les prédictions actives\n\
    • `/debug` - Informations système\n\
    • `/reset` - Reset manuel des prédictions\n\
    • `/transfert` - Activer le transfert des messages\n\
    • `/stoptransfert` - Désactiver le transfert\n\
    • `/help` - Cette aide";

const NOT_ADMIN_TEXT: &str = "Commande réservée à l'administrateur";

impl<P: PredictionPublisher> PredictionEngine<P> {
    /// Handle one private-chat message. Unknown commands and plain text are
    /// ignored silently.
    pub(crate) async fn handle_command(&mut self, msg: &InboundMessage) {
        let command = msg.text.split_whitespace().next().unwrap_or("");
        // Tolerate the /command@BotName form used in multi-bot chats.
        let command = command.split('@').next().unwrap_or(command);

        match command {
            "/start" => self.reply(msg, START_TEXT).await,
            "/help" => self.reply(msg, HELP_TEXT).await,
            "/status" => {
                if self.check_admin(msg).await {
                    let status = self.status_text();
                    self.reply(msg, &status).await;
                }
            }
            "/debug" => {
                if self.check_admin(msg).await {
                    let debug = self.debug_text();
                    self.reply(msg, &debug).await;
                }
            }
            "/reset" => {
                if self.check_admin(msg).await {
                    self.reset_and_notify(ResetSource::Manual).await;
                    self.reply(
                        msg,
                        "🔄 **Reset manuel effectué!**\n\nToutes les prédictions ont été effacées.",
                    )
                    .await;
                }
            }
            "/transfert" | "/activetransfert" => {
                if self.check_admin(msg).await {
                    self.forwarding_enabled = true;
                    info!("Passthrough forwarding enabled");
                    self.reply(msg, "✅ Transfert des messages activé!").await;
                }
            }
            "/stoptransfert" => {
                if self.check_admin(msg).await {
                    self.forwarding_enabled = false;
                    info!("Passthrough forwarding disabled");
                    self.reply(msg, "⛔ Transfert des messages désactivé.").await;
                }
            }
            _ => {}
        }
    }

    fn is_admin(&self, msg: &InboundMessage) -> bool {
        self.config.admin_id != 0 && msg.sender_id == Some(self.config.admin_id)
    }

    /// Gate a privileged command, refusing non-admin callers.
    async fn check_admin(&self, msg: &InboundMessage) -> bool {
        if self.is_admin(msg) {
            return true;
        }
        self.reply(msg, NOT_ADMIN_TEXT).await;
        false
    }

    async fn reply(&self, msg: &InboundMessage, text: &str) {
        self.publisher.send_to(msg.chat_id, text).await;
    }

    /// Current round and open forecasts, for `/status`.
    pub(crate) fn status_text(&self) -> String {
        let mut out = format!(
            "📊 **État des prédictions:**\n\n🎮 Jeu actuel: #{}\n\n",
            self.current_round
        );
        if self.pending.is_empty() {
            out.push_str("**🔮 Aucune prédiction active**\n");
        } else {
            out.push_str(&format!("**🔮 Actives ({}):**\n", self.pending.len()));
            for (round, prediction) in &self.pending {
                out.push_str(&format!(
                    "• Jeu #{round}: {} - Statut: {}\n",
                    prediction.predicted_suit.display(),
                    prediction.status.glyph()
                ));
            }
        }
        out
    }

    /// Configuration, channel access and state dump, for `/debug`.
    pub(crate) fn debug_text(&self) -> String {
        let access = |ok: bool| if ok { "✅ OK" } else { "❌ Non accessible" };
        format!(
            "🔍 **Informations de débogage:**\n\n\
             **Configuration:**\n\
             • Source Channel: {}\n\
             • Prediction Channel: {}\n\
             • Admin ID: {}\n\n\
             **Accès aux canaux:**\n\
             • Canal source: {}\n\
             • Canal prédiction: {}\n\n\
             **État:**\n\
             • Jeu actuel: #{}\n\
             • Prédictions actives: {}\n\n\
             **Règles de transformation:**\n\
             • Jeux PAIRS: ♠️→♣️, ♣️→♠️, ♦️→♥️, ♥️→♦️\n\
             • Jeux IMPAIRS: ♠️→♥️, ♣️→♦️, ♦️→♣️, ♥️→♠️\n\n\
             **Reset automatique:**\n\
             • Toutes les 2 heures\n\
             • Quotidien à 00h59 WAT",
            self.config.source_chat_id,
            self.config.prediction_chat_id,
            self.config.admin_id,
            access(self.config.source_channel_ok),
            access(self.config.prediction_channel_ok),
            self.current_round,
            self.pending.len(),
        )
    }
}
