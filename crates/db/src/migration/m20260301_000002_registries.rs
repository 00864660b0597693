//! Per-company registries: clienti, fornitori, commesse, rapportini.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(REGISTRIES_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "DROP TABLE IF EXISTS rapportini CASCADE;
             DROP TABLE IF EXISTS commesse CASCADE;
             DROP TABLE IF EXISTS fornitori CASCADE;
             DROP TABLE IF EXISTS clienti CASCADE;
             DROP TYPE IF EXISTS commessa_stato;",
        )
        .await?;
        Ok(())
    }
}

const REGISTRIES_SQL: &str = r"
CREATE TYPE commessa_stato AS ENUM ('aperta', 'sospesa', 'chiusa');

CREATE TABLE clienti (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    denominazione VARCHAR(255) NOT NULL,
    partita_iva VARCHAR(16),
    codice_fiscale VARCHAR(16),
    indirizzo TEXT,
    email VARCHAR(255),
    telefono VARCHAR(32),
    note TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_clienti_company ON clienti(company_id, denominazione);

CREATE TABLE fornitori (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    denominazione VARCHAR(255) NOT NULL,
    partita_iva VARCHAR(16),
    codice_fiscale VARCHAR(16),
    indirizzo TEXT,
    email VARCHAR(255),
    telefono VARCHAR(32),
    note TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_fornitori_company ON fornitori(company_id, denominazione);

CREATE TABLE commesse (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    codice VARCHAR(50) NOT NULL,
    descrizione TEXT NOT NULL,
    cliente_id UUID REFERENCES clienti(id) ON DELETE SET NULL,
    stato commessa_stato NOT NULL DEFAULT 'aperta',
    indirizzo TEXT,
    data_inizio DATE,
    data_fine DATE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_commesse_company_codice UNIQUE (company_id, codice)
);

CREATE INDEX idx_commesse_company ON commesse(company_id, created_at DESC);

CREATE TABLE rapportini (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    commessa_id UUID NOT NULL REFERENCES commesse(id) ON DELETE CASCADE,
    operaio VARCHAR(255) NOT NULL,
    data DATE NOT NULL,
    ore NUMERIC(5,2) NOT NULL CHECK (ore > 0),
    note TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_rapportini_company ON rapportini(company_id, data DESC);
CREATE INDEX idx_rapportini_commessa ON rapportini(commessa_id, data DESC);
";
