use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create chunks table: bounded transcript spans in a contiguous
        // zero-based sequence per meeting
        let create_chunks_sql = r#"
            CREATE TABLE IF NOT EXISTS consultant_copilot.chunks (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                meeting_id UUID NOT NULL
                    REFERENCES consultant_copilot.meetings(id) ON DELETE CASCADE,
                chunk_index INTEGER NOT NULL,
                content TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

                CONSTRAINT chunks_meeting_index_unique UNIQUE(meeting_id, chunk_index)
            )
        "#;

        manager
            .get_connection()
            .execute_unprepared(create_chunks_sql)
            .await?;

        manager
            .get_connection()
            .execute_unprepared("ALTER TABLE consultant_copilot.chunks OWNER TO copilot")
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX IF NOT EXISTS ix_chunks_meeting_id
                 ON consultant_copilot.chunks (meeting_id)",
            )
            .await?;

        // Create embeddings table: one fixed-dimension vector per chunk,
        // stored as a float4 array and ranked in-process
        let create_embeddings_sql = r#"
            CREATE TABLE IF NOT EXISTS consultant_copilot.embeddings (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                chunk_id UUID NOT NULL
                    REFERENCES consultant_copilot.chunks(id) ON DELETE CASCADE,
                meeting_id UUID NOT NULL
                    REFERENCES consultant_copilot.meetings(id) ON DELETE CASCADE,
                vector REAL[] NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

                CONSTRAINT embeddings_chunk_unique UNIQUE(chunk_id)
            )
        "#;

        manager
            .get_connection()
            .execute_unprepared(create_embeddings_sql)
            .await?;

        manager
            .get_connection()
            .execute_unprepared("ALTER TABLE consultant_copilot.embeddings OWNER TO copilot")
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX IF NOT EXISTS ix_embeddings_meeting_id
                 ON consultant_copilot.embeddings (meeting_id)",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS consultant_copilot.embeddings")
            .await?;
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS consultant_copilot.chunks")
            .await?;

        Ok(())
    }
}
