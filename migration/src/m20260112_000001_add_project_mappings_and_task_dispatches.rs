use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create project_mappings table: at most one tracker project per client
        let create_mappings_sql = r#"
            CREATE TABLE IF NOT EXISTS consultant_copilot.project_mappings (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                client_id UUID NOT NULL
                    REFERENCES consultant_copilot.clients(id) ON DELETE CASCADE,
                todoist_project_id VARCHAR(50) NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

                CONSTRAINT project_mappings_client_unique UNIQUE(client_id)
            )
        "#;

        manager
            .get_connection()
            .execute_unprepared(create_mappings_sql)
            .await?;

        manager
            .get_connection()
            .execute_unprepared("ALTER TABLE consultant_copilot.project_mappings OWNER TO copilot")
            .await?;

        // Create task_dispatches table: the dispatcher's idempotency
        // records, written before each external tracker call
        let create_dispatches_sql = r#"
            CREATE TABLE IF NOT EXISTS consultant_copilot.task_dispatches (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                meeting_id UUID NOT NULL
                    REFERENCES consultant_copilot.meetings(id) ON DELETE CASCADE,
                client_id UUID NOT NULL
                    REFERENCES consultant_copilot.clients(id) ON DELETE CASCADE,
                content TEXT NOT NULL,
                todoist_task_id VARCHAR(255),
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

                CONSTRAINT task_dispatches_meeting_content_unique UNIQUE(meeting_id, content)
            )
        "#;

        manager
            .get_connection()
            .execute_unprepared(create_dispatches_sql)
            .await?;

        manager
            .get_connection()
            .execute_unprepared("ALTER TABLE consultant_copilot.task_dispatches OWNER TO copilot")
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX IF NOT EXISTS ix_task_dispatches_meeting_id
                 ON consultant_copilot.task_dispatches (meeting_id)",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS consultant_copilot.task_dispatches")
            .await?;
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS consultant_copilot.project_mappings")
            .await?;

        Ok(())
    }
}
