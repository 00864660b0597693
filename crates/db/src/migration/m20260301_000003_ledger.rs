//! Ledger tables: entrate (revenue) and uscite (cost).
//!
//! The partial unique indexes on (company_id, numero_fattura) back the
//! duplicate-invoice-number conflict surfaced to clients as a 409.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(LEDGER_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "DROP TABLE IF EXISTS uscite CASCADE;
             DROP TABLE IF EXISTS entrate CASCADE;
             DROP TYPE IF EXISTS tipo_documento;",
        )
        .await?;
        Ok(())
    }
}

const LEDGER_SQL: &str = r"
CREATE TYPE tipo_documento AS ENUM ('fattura', 'scontrino');

CREATE TABLE entrate (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    commessa_id UUID NOT NULL REFERENCES commesse(id) ON DELETE CASCADE,
    numero_fattura VARCHAR(50),
    cliente VARCHAR(255) NOT NULL,
    tipologia VARCHAR(255) NOT NULL,
    emissione_fattura DATE,
    data_pagamento DATE NOT NULL,
    imponibile NUMERIC(14,2) NOT NULL CHECK (imponibile >= 0.01),
    iva NUMERIC(14,2) NOT NULL CHECK (iva >= 0),
    importo_totale NUMERIC(14,2) NOT NULL CHECK (importo_totale >= 0.01),
    aliquota_iva SMALLINT NOT NULL CHECK (aliquota_iva IN (0, 4, 10, 22)),
    stato VARCHAR(20) NOT NULL CHECK (stato IN ('Pagato', 'Non Pagato')),
    metodo_pagamento VARCHAR(100),
    allegato_key TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_entrate_pagamento_dopo_emissione
        CHECK (emissione_fattura IS NULL OR data_pagamento >= emissione_fattura)
);

CREATE UNIQUE INDEX uq_entrate_company_numero_fattura
    ON entrate(company_id, numero_fattura)
    WHERE numero_fattura IS NOT NULL;

CREATE INDEX idx_entrate_commessa ON entrate(commessa_id, data_pagamento DESC);
CREATE INDEX idx_entrate_company ON entrate(company_id, data_pagamento DESC);

CREATE TABLE uscite (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    commessa_id UUID NOT NULL REFERENCES commesse(id) ON DELETE CASCADE,
    tipo_documento tipo_documento NOT NULL DEFAULT 'fattura',
    numero_fattura VARCHAR(50),
    fornitore VARCHAR(255) NOT NULL,
    tipologia VARCHAR(255) NOT NULL,
    emissione_fattura DATE,
    data_pagamento DATE NOT NULL,
    imponibile NUMERIC(14,2) NOT NULL CHECK (imponibile >= 0.01),
    iva NUMERIC(14,2) NOT NULL CHECK (iva >= 0),
    importo_totale NUMERIC(14,2) NOT NULL CHECK (importo_totale >= 0.01),
    aliquota_iva SMALLINT NOT NULL CHECK (aliquota_iva IN (0, 4, 10, 22)),
    stato VARCHAR(20) NOT NULL CHECK (stato IN ('Pagato', 'Non Pagato')),
    metodo_pagamento VARCHAR(100),
    allegato_key TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    -- Invoices carry a number and issue date; receipts carry neither
    CONSTRAINT chk_uscite_fattura_campi CHECK (
        (tipo_documento = 'fattura' AND numero_fattura IS NOT NULL AND emissione_fattura IS NOT NULL)
        OR
        (tipo_documento = 'scontrino' AND numero_fattura IS NULL AND emissione_fattura IS NULL)
    ),
    CONSTRAINT chk_uscite_scontrino_pagato
        CHECK (tipo_documento = 'fattura' OR stato = 'Pagato'),
    CONSTRAINT chk_uscite_pagamento_dopo_emissione
        CHECK (emissione_fattura IS NULL OR data_pagamento >= emissione_fattura)
);

CREATE UNIQUE INDEX uq_uscite_company_numero_fattura
    ON uscite(company_id, numero_fattura)
    WHERE numero_fattura IS NOT NULL;

CREATE INDEX idx_uscite_commessa ON uscite(commessa_id, data_pagamento DESC);
CREATE INDEX idx_uscite_company ON uscite(company_id, data_pagamento DESC);
";
