//! Northwind sample subset used to seed the memory store.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::database::memory::Tables;
use crate::database::models::{Category, Employee, EmployeeFields, Product, ProductFields, Supplier, Territory};

struct EmployeeRow {
    id: i32,
    last_name: &'static str,
    first_name: &'static str,
    title: &'static str,
    courtesy: &'static str,
    birth: (i32, u32, u32),
    hire: (i32, u32, u32),
    address: &'static str,
    city: &'static str,
    region: Option<&'static str>,
    postal_code: &'static str,
    country: &'static str,
    phone: &'static str,
    extension: &'static str,
    reports_to: Option<i32>,
}

const EMPLOYEES: &[EmployeeRow] = &[
    EmployeeRow { id: 1, last_name: "Davolio", first_name: "Nancy", title: "Sales Representative", courtesy: "Ms.", birth: (1948, 12, 8), hire: (1992, 5, 1), address: "507 - 20th Ave. E. Apt. 2A", city: "Seattle", region: Some("WA"), postal_code: "98122", country: "USA", phone: "(206) 555-9857", extension: "5467", reports_to: Some(2) },
    EmployeeRow { id: 2, last_name: "Fuller", first_name: "Andrew", title: "Vice President, Sales", courtesy: "Dr.", birth: (1952, 2, 19), hire: (1992, 8, 14), address: "908 W. Capital Way", city: "Tacoma", region: Some("WA"), postal_code: "98401", country: "USA", phone: "(206) 555-9482", extension: "3457", reports_to: None },
    EmployeeRow { id: 3, last_name: "Leverling", first_name: "Janet", title: "Sales Representative", courtesy: "Ms.", birth: (1963, 8, 30), hire: (1992, 4, 1), address: "722 Moss Bay Blvd.", city: "Kirkland", region: Some("WA"), postal_code: "98033", country: "USA", phone: "(206) 555-3412", extension: "3355", reports_to: Some(2) },
    EmployeeRow { id: 4, last_name: "Peacock", first_name: "Margaret", title: "Sales Representative", courtesy: "Mrs.", birth: (1937, 9, 19), hire: (1993, 5, 3), address: "4110 Old Redmond Rd.", city: "Redmond", region: Some("WA"), postal_code: "98052", country: "USA", phone: "(206) 555-8122", extension: "5176", reports_to: Some(2) },
    EmployeeRow { id: 5, last_name: "Buchanan", first_name: "Steven", title: "Sales Manager", courtesy: "Mr.", birth: (1955, 3, 4), hire: (1993, 10, 17), address: "14 Garrett Hill", city: "London", region: None, postal_code: "SW1 8JR", country: "UK", phone: "(71) 555-4848", extension: "3453", reports_to: Some(2) },
    EmployeeRow { id: 6, last_name: "Suyama", first_name: "Michael", title: "Sales Representative", courtesy: "Mr.", birth: (1963, 7, 2), hire: (1993, 10, 17), address: "Coventry House Miner Rd.", city: "London", region: None, postal_code: "EC2 7JR", country: "UK", phone: "(71) 555-7773", extension: "428", reports_to: Some(5) },
    EmployeeRow { id: 7, last_name: "King", first_name: "Robert", title: "Sales Representative", courtesy: "Mr.", birth: (1960, 5, 29), hire: (1994, 1, 2), address: "Edgeham Hollow Winchester Way", city: "London", region: None, postal_code: "RG1 9SP", country: "UK", phone: "(71) 555-5598", extension: "465", reports_to: Some(5) },
    EmployeeRow { id: 8, last_name: "Callahan", first_name: "Laura", title: "Inside Sales Coordinator", courtesy: "Ms.", birth: (1958, 1, 9), hire: (1994, 3, 5), address: "4726 - 11th Ave. N.E.", city: "Seattle", region: Some("WA"), postal_code: "98105", country: "USA", phone: "(206) 555-1189", extension: "2344", reports_to: Some(2) },
    EmployeeRow { id: 9, last_name: "Dodsworth", first_name: "Anne", title: "Sales Representative", courtesy: "Ms.", birth: (1966, 1, 27), hire: (1994, 11, 15), address: "7 Houndstooth Rd.", city: "London", region: None, postal_code: "WG2 7LT", country: "UK", phone: "(71) 555-4444", extension: "452", reports_to: Some(5) },
];

const TERRITORIES: &[(&str, &str, i32)] = &[
    ("01581", "Westboro", 1),
    ("01730", "Bedford", 1),
    ("01833", "Georgetow", 1),
    ("02116", "Boston", 1),
    ("02139", "Cambridge", 1),
    ("02184", "Braintree", 1),
    ("02903", "Providence", 1),
    ("03049", "Hollis", 3),
    ("03801", "Portsmouth", 3),
    ("06897", "Wilton", 1),
    ("10019", "New York", 1),
    ("19428", "Philadelphia", 3),
    ("19713", "Neward", 1),
    ("20852", "Rockville", 1),
    ("27403", "Greensboro", 1),
    ("30346", "Atlanta", 4),
    ("31406", "Savannah", 4),
    ("44122", "Beachwood", 3),
    ("48075", "Southfield", 3),
    ("60179", "Hoffman Estates", 2),
    ("85014", "Phoenix", 2),
    ("94025", "Menlo Park", 2),
    ("95008", "Campbell", 2),
    ("98004", "Bellevue", 2),
    ("98052", "Redmond", 2),
    ("98104", "Seattle", 2),
];

const EMPLOYEE_TERRITORIES: &[(i32, &str)] = &[
    (1, "06897"), (1, "19713"),
    (2, "01581"), (2, "01730"), (2, "01833"), (2, "02116"), (2, "02139"), (2, "02184"),
    (3, "30346"), (3, "31406"),
    (4, "20852"), (4, "27403"),
    (5, "02903"), (5, "10019"),
    (6, "85014"), (6, "98004"), (6, "98052"), (6, "98104"),
    (7, "60179"), (7, "94025"), (7, "95008"),
    (8, "19428"), (8, "44122"),
    (9, "03049"), (9, "03801"), (9, "48075"),
];

const CATEGORIES: &[(i32, &str)] = &[
    (1, "Beverages"),
    (2, "Condiments"),
    (3, "Confections"),
    (4, "Dairy Products"),
    (5, "Grains/Cereals"),
    (6, "Meat/Poultry"),
    (7, "Produce"),
    (8, "Seafood"),
];

const SUPPLIERS: &[(i32, &str)] = &[
    (1, "Exotic Liquids"),
    (2, "New Orleans Cajun Delights"),
    (3, "Grandma Kelly's Homestead"),
    (4, "Tokyo Traders"),
    (5, "Cooperativa de Quesos 'Las Cabras'"),
    (6, "Mayumi's"),
    (7, "Pavlova, Ltd."),
    (8, "Specialty Biscuits, Ltd."),
    (9, "PB Knäckebröd AB"),
];

/// (id, name, supplier, category, quantity per unit, price in cents, stock, on order, reorder, discontinued)
type ProductRow = (i32, &'static str, i32, i32, &'static str, i64, i32, i32, i32, bool);

const PRODUCTS: &[ProductRow] = &[
    (1, "Chai", 1, 1, "10 boxes x 20 bags", 1800, 39, 0, 10, false),
    (2, "Chang", 1, 1, "24 - 12 oz bottles", 1900, 17, 40, 25, false),
    (3, "Aniseed Syrup", 1, 2, "12 - 550 ml bottles", 1000, 13, 70, 25, false),
    (4, "Chef Anton's Cajun Seasoning", 2, 2, "48 - 6 oz jars", 2200, 53, 0, 0, false),
    (5, "Chef Anton's Gumbo Mix", 2, 2, "36 boxes", 2135, 0, 0, 0, true),
    (6, "Grandma's Boysenberry Spread", 3, 2, "12 - 8 oz jars", 2500, 120, 0, 25, false),
    (7, "Uncle Bob's Organic Dried Pears", 3, 7, "12 - 1 lb pkgs.", 3000, 15, 0, 10, false),
    (8, "Northwoods Cranberry Sauce", 3, 2, "12 - 12 oz jars", 4000, 6, 0, 0, false),
    (9, "Mishi Kobe Niku", 4, 6, "18 - 500 g pkgs.", 9700, 29, 0, 0, true),
    (10, "Ikura", 4, 8, "12 - 200 ml jars", 3100, 31, 0, 0, false),
    (11, "Queso Cabrales", 5, 4, "1 kg pkg.", 2100, 22, 30, 30, false),
    (12, "Queso Manchego La Pastora", 5, 4, "10 - 500 g pkgs.", 3800, 86, 0, 0, false),
    (13, "Konbu", 6, 8, "2 kg box", 600, 24, 0, 5, false),
    (14, "Tofu", 6, 7, "40 - 100 g pkgs.", 2325, 35, 0, 0, false),
    (15, "Genen Shouyu", 6, 2, "24 - 250 ml bottles", 1550, 39, 0, 5, false),
    (16, "Pavlova", 7, 3, "32 - 500 g boxes", 1745, 29, 0, 10, false),
    (17, "Alice Mutton", 7, 6, "20 - 1 kg tins", 3900, 0, 0, 0, true),
    (18, "Carnarvon Tigers", 7, 8, "16 kg pkg.", 6250, 42, 0, 0, false),
    (19, "Teatime Chocolate Biscuits", 8, 3, "10 boxes x 12 pieces", 920, 25, 0, 5, false),
    (20, "Sir Rodney's Marmalade", 8, 3, "30 gift boxes", 8100, 40, 0, 0, false),
    (21, "Sir Rodney's Scones", 8, 3, "24 pkgs. x 4 pieces", 1000, 3, 40, 5, false),
    (22, "Gustaf's Knäckebröd", 9, 5, "24 - 500 g pkgs.", 2100, 104, 0, 25, false),
    (23, "Tunnbröd", 9, 5, "12 - 250 g pkgs.", 900, 61, 0, 25, false),
];

fn date((y, m, d): (i32, u32, u32)) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

pub(crate) fn northwind() -> Tables {
    let mut tables = Tables::default();

    for row in EMPLOYEES {
        let fields = EmployeeFields {
            last_name: row.last_name.to_string(),
            first_name: row.first_name.to_string(),
            title: Some(row.title.to_string()),
            title_of_courtesy: Some(row.courtesy.to_string()),
            birth_date: date(row.birth),
            hire_date: date(row.hire),
            address: Some(row.address.to_string()),
            city: Some(row.city.to_string()),
            region: row.region.map(str::to_string),
            postal_code: Some(row.postal_code.to_string()),
            country: Some(row.country.to_string()),
            home_phone: Some(row.phone.to_string()),
            extension: Some(row.extension.to_string()),
            notes: None,
            reports_to: row.reports_to,
            photo_path: None,
        };
        tables.employees.insert(row.id, Employee { employee_id: row.id, fields });
    }

    for (id, description, region_id) in TERRITORIES {
        tables.territories.insert(
            id.to_string(),
            Territory { territory_id: id.to_string(), territory_description: description.to_string(), region_id: *region_id },
        );
    }

    for (employee_id, territory_id) in EMPLOYEE_TERRITORIES {
        tables.employee_territories.insert((*employee_id, territory_id.to_string()));
    }

    for (category_id, name) in CATEGORIES {
        tables.categories.insert(*category_id, Category { category_id: *category_id, category_name: name.to_string() });
    }

    for (supplier_id, name) in SUPPLIERS {
        tables.suppliers.insert(*supplier_id, Supplier { supplier_id: *supplier_id, company_name: name.to_string() });
    }

    for &(id, name, supplier_id, category_id, quantity, cents, stock, on_order, reorder, discontinued) in PRODUCTS {
        let fields = ProductFields {
            product_name: name.to_string(),
            category_id,
            supplier_id,
            quantity_per_unit: Some(quantity.to_string()),
            unit_price: Decimal::new(cents, 2),
            units_in_stock: stock,
            units_on_order: on_order,
            reorder_level: reorder,
            discontinued,
        };
        tables.products.insert(id, Product { product_id: id, fields });
    }

    tables
}
