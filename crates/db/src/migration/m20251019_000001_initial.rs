//! Initial database migration.
//!
//! Creates the enum types, registry tables, reservations with the
//! double-booking exclusion constraint, the service catalog and lines, and
//! the payment ledger. Constraint names are the ones the core store contract
//! reports back to the facade.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: EXTENSIONS & ENUMS
        // ============================================================
        db.execute_unprepared(EXTENSIONS_SQL).await?;
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: REGISTRY
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(ROOMS_SQL).await?;
        db.execute_unprepared(CUSTOMERS_SQL).await?;

        // ============================================================
        // PART 3: RESERVATIONS
        // ============================================================
        db.execute_unprepared(RESERVATIONS_SQL).await?;

        // ============================================================
        // PART 4: SERVICE CATALOG & LINES
        // ============================================================
        db.execute_unprepared(SERVICE_ITEMS_SQL).await?;
        db.execute_unprepared(RESERVATION_SERVICES_SQL).await?;

        // ============================================================
        // PART 5: PAYMENT LEDGER
        // ============================================================
        db.execute_unprepared(PAYMENTS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const EXTENSIONS_SQL: &str = r"
-- Needed to mix uuid equality and daterange overlap in one GiST index
CREATE EXTENSION IF NOT EXISTS btree_gist;
";

const ENUMS_SQL: &str = r"
CREATE TYPE user_role AS ENUM ('receptionist', 'manager', 'admin');

CREATE TYPE room_type AS ENUM ('single', 'double', 'twin', 'suite', 'family');

CREATE TYPE room_state AS ENUM (
    'available',
    'occupied',
    'maintenance',
    'out_of_service'
);

CREATE TYPE reservation_status AS ENUM (
    'pending',
    'confirmed',
    'in_progress',
    'completed',
    'cancelled'
);

CREATE TYPE payment_method AS ENUM (
    'cash',
    'card',
    'check',
    'transfer',
    'paypal',
    'online'
);

CREATE TYPE payment_type AS ENUM ('deposit', 'balance', 'refund', 'fee');
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    username VARCHAR(100) NOT NULL UNIQUE,
    role user_role NOT NULL DEFAULT 'receptionist',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const ROOMS_SQL: &str = r"
CREATE TABLE rooms (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    number VARCHAR(10) NOT NULL,
    room_type room_type NOT NULL,
    state room_state NOT NULL DEFAULT 'available',
    capacity INTEGER NOT NULL CHECK (capacity BETWEEN 1 AND 20),
    price NUMERIC(12, 2) NOT NULL CHECK (price > 0),
    archived_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE UNIQUE INDEX rooms_number_active_key ON rooms(number) WHERE archived_at IS NULL;
";

const CUSTOMERS_SQL: &str = r"
CREATE TABLE customers (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    full_name VARCHAR(100) NOT NULL,
    phone VARCHAR(21) NOT NULL,
    email VARCHAR(254),
    archived_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE UNIQUE INDEX customers_phone_active_key ON customers(phone) WHERE archived_at IS NULL;
";

const RESERVATIONS_SQL: &str = r"
CREATE TABLE reservations (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    room_id UUID NOT NULL REFERENCES rooms(id) ON DELETE RESTRICT,
    customer_id UUID NOT NULL REFERENCES customers(id) ON DELETE RESTRICT,
    created_by UUID NOT NULL REFERENCES users(id) ON DELETE RESTRICT,
    start_date DATE NOT NULL,
    end_date DATE NOT NULL,
    status reservation_status NOT NULL DEFAULT 'pending',
    base_amount NUMERIC(12, 2) NOT NULL,
    -- Wide enough for any total the ledger can compute without overflow.
    total_amount NUMERIC(19, 2) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT reservations_dates_check CHECK (end_date > start_date),
    CONSTRAINT reservations_base_amount_check
        CHECK (base_amount BETWEEN 0.01 AND 99999999.99),
    CONSTRAINT reservations_total_amount_check CHECK (total_amount >= base_amount),

    -- Authoritative double-booking guard. Half-open ranges, so a checkout
    -- day can be the next guest's check-in day.
    CONSTRAINT reservations_room_no_overlap EXCLUDE USING gist (
        room_id WITH =,
        daterange(start_date, end_date, '[)') WITH &&
    ) WHERE (status <> 'cancelled')
);

CREATE INDEX idx_reservations_room_dates ON reservations(room_id, end_date);
CREATE INDEX idx_reservations_customer ON reservations(customer_id, end_date);
";

const SERVICE_ITEMS_SQL: &str = r"
CREATE TABLE service_items (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(80) NOT NULL,
    unit_price NUMERIC(12, 2) NOT NULL CHECK (unit_price BETWEEN 0.01 AND 999999.99),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE UNIQUE INDEX service_items_name_lower_key ON service_items(lower(name));
";

const RESERVATION_SERVICES_SQL: &str = r"
CREATE TABLE reservation_services (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    reservation_id UUID NOT NULL,
    service_item_id UUID NOT NULL,
    unit_price NUMERIC(12, 2) NOT NULL CHECK (unit_price > 0),
    quantity INTEGER NOT NULL CHECK (quantity BETWEEN 1 AND 9999),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT reservation_services_reservation_id_fkey
        FOREIGN KEY (reservation_id) REFERENCES reservations(id) ON DELETE RESTRICT,
    CONSTRAINT reservation_services_service_item_id_fkey
        FOREIGN KEY (service_item_id) REFERENCES service_items(id) ON DELETE RESTRICT,
    CONSTRAINT reservation_services_reservation_service_key
        UNIQUE (reservation_id, service_item_id)
);

CREATE INDEX idx_reservation_services_item ON reservation_services(service_item_id);
";

const PAYMENTS_SQL: &str = r"
CREATE TABLE payments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    reservation_id UUID NOT NULL,
    amount NUMERIC(12, 2) NOT NULL CHECK (amount BETWEEN 0.01 AND 999999.99),
    method payment_method NOT NULL,
    payment_type payment_type NOT NULL DEFAULT 'balance',
    paid_at TIMESTAMPTZ NOT NULL,
    transaction_ref VARCHAR(100),
    comment VARCHAR(500),
    recorded_by UUID NOT NULL REFERENCES users(id) ON DELETE RESTRICT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT payments_reservation_id_fkey
        FOREIGN KEY (reservation_id) REFERENCES reservations(id) ON DELETE RESTRICT
);

CREATE INDEX idx_payments_reservation ON payments(reservation_id, created_at);
";

const DROP_ALL_SQL: &str = r"
-- Order matters due to foreign key constraints
DROP TABLE IF EXISTS payments;
DROP TABLE IF EXISTS reservation_services;
DROP TABLE IF EXISTS service_items;
DROP TABLE IF EXISTS reservations;
DROP TABLE IF EXISTS customers;
DROP TABLE IF EXISTS rooms;
DROP TABLE IF EXISTS users;

DROP TYPE IF EXISTS payment_type;
DROP TYPE IF EXISTS payment_method;
DROP TYPE IF EXISTS reservation_status;
DROP TYPE IF EXISTS room_state;
DROP TYPE IF EXISTS room_type;
DROP TYPE IF EXISTS user_role;
";
