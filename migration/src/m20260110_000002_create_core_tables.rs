use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create meeting_status enum (the ingestion state machine states)
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE TYPE consultant_copilot.meeting_status AS ENUM (
                    'received',
                    'transcribed',
                    'type_pending',
                    'summarizing',
                    'summarized',
                    'tasks_dispatched',
                    'failed'
                )",
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared("ALTER TYPE consultant_copilot.meeting_status OWNER TO copilot")
            .await?;

        // Create meeting_type enum (summarization prompt selectors)
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE TYPE consultant_copilot.meeting_type AS ENUM (
                    'working_meeting',
                    'diagnostics',
                    'traction',
                    'intro'
                )",
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared("ALTER TYPE consultant_copilot.meeting_type OWNER TO copilot")
            .await?;

        // Create clients table
        let create_clients_sql = r#"
            CREATE TABLE IF NOT EXISTS consultant_copilot.clients (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                name VARCHAR(255) NOT NULL,
                telegram_chat_id BIGINT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#;

        manager
            .get_connection()
            .execute_unprepared(create_clients_sql)
            .await?;

        manager
            .get_connection()
            .execute_unprepared("ALTER TABLE consultant_copilot.clients OWNER TO copilot")
            .await?;

        // Create meetings table
        let create_meetings_sql = r#"
            CREATE TABLE IF NOT EXISTS consultant_copilot.meetings (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                fireflies_id VARCHAR(255),
                title VARCHAR(500) NOT NULL,
                date TIMESTAMPTZ,
                transcript TEXT,
                client_id UUID
                    REFERENCES consultant_copilot.clients(id) ON DELETE SET NULL,
                meeting_type consultant_copilot.meeting_type,
                status consultant_copilot.meeting_status NOT NULL DEFAULT 'received',
                error_message TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

                CONSTRAINT meetings_fireflies_id_unique UNIQUE(fireflies_id)
            )
        "#;

        manager
            .get_connection()
            .execute_unprepared(create_meetings_sql)
            .await?;

        manager
            .get_connection()
            .execute_unprepared("ALTER TABLE consultant_copilot.meetings OWNER TO copilot")
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX IF NOT EXISTS ix_meetings_client_id
                 ON consultant_copilot.meetings (client_id)",
            )
            .await?;

        // Create summaries table (append-only, one row per summarization run)
        let create_summaries_sql = r#"
            CREATE TABLE IF NOT EXISTS consultant_copilot.summaries (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                meeting_id UUID NOT NULL
                    REFERENCES consultant_copilot.meetings(id) ON DELETE CASCADE,
                meeting_type consultant_copilot.meeting_type NOT NULL,
                content_text TEXT NOT NULL,
                content_json JSONB,
                truncated BOOLEAN NOT NULL DEFAULT FALSE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#;

        manager
            .get_connection()
            .execute_unprepared(create_summaries_sql)
            .await?;

        manager
            .get_connection()
            .execute_unprepared("ALTER TABLE consultant_copilot.summaries OWNER TO copilot")
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX IF NOT EXISTS ix_summaries_meeting_id
                 ON consultant_copilot.summaries (meeting_id)",
            )
            .await?;

        // Create leads table
        let create_leads_sql = r#"
            CREATE TABLE IF NOT EXISTS consultant_copilot.leads (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                client_name VARCHAR(255) NOT NULL,
                client_tg VARCHAR(255),
                message TEXT,
                channel VARCHAR(100),
                status VARCHAR(50) NOT NULL DEFAULT 'new',
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#;

        manager
            .get_connection()
            .execute_unprepared(create_leads_sql)
            .await?;

        manager
            .get_connection()
            .execute_unprepared("ALTER TABLE consultant_copilot.leads OWNER TO copilot")
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS consultant_copilot.leads")
            .await?;
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS consultant_copilot.summaries")
            .await?;
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS consultant_copilot.meetings")
            .await?;
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS consultant_copilot.clients")
            .await?;
        manager
            .get_connection()
            .execute_unprepared("DROP TYPE IF EXISTS consultant_copilot.meeting_type")
            .await?;
        manager
            .get_connection()
            .execute_unprepared("DROP TYPE IF EXISTS consultant_copilot.meeting_status")
            .await?;

        Ok(())
    }
}
